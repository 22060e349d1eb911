//! Transforms over the growing Dockerfile and run-argument sequences.
//!
//! Each transform is a total function from the sequence built so far to
//! the next one. A transform decides for itself whether it prepends,
//! appends, or wraps; the chain only fixes the order they run in.

use std::fmt;

type SequenceFn = dyn Fn(Vec<String>) -> Vec<String> + Send + Sync;

/// Dockerfile directives that may appear at most once per composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Directive {
    /// Final command, `CMD`.
    Cmd,
    /// Run-as-user, `USER`.
    User,
}

impl Directive {
    /// Dockerfile keyword for the directive.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Cmd => "CMD",
            Self::User => "USER",
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// One step of the Dockerfile line chain.
pub struct ImageTransform {
    directive: Option<Directive>,
    apply: Box<SequenceFn>,
}

impl ImageTransform {
    /// Wraps an arbitrary line transform.
    #[must_use]
    pub fn new(f: impl Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static) -> Self {
        Self {
            directive: None,
            apply: Box::new(f),
        }
    }

    /// Appends `lines` after everything built so far.
    #[must_use]
    pub fn append<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        Self::new(move |mut setup| {
            setup.extend(lines.iter().cloned());
            setup
        })
    }

    /// Inserts `lines` before everything built so far.
    #[must_use]
    pub fn prepend<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        Self::new(move |setup| lines.iter().cloned().chain(setup).collect())
    }

    /// Appends a single-use directive such as `CMD bash`.
    #[must_use]
    pub fn directive(directive: Directive, value: impl Into<String>) -> Self {
        let line = format!("{} {}", directive.keyword(), value.into());
        Self {
            directive: Some(directive),
            ..Self::append([line])
        }
    }

    /// Directive this transform sets, if any.
    #[must_use]
    pub const fn sets(&self) -> Option<Directive> {
        self.directive
    }

    /// Runs the transform.
    #[must_use]
    pub fn apply(&self, lines: Vec<String>) -> Vec<String> {
        (self.apply)(lines)
    }
}

impl fmt::Debug for ImageTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageTransform")
            .field("directive", &self.directive)
            .finish_non_exhaustive()
    }
}

/// One step of the `docker run` argument chain.
pub struct RunArgsTransform {
    apply: Box<SequenceFn>,
}

impl RunArgsTransform {
    /// Wraps an arbitrary argument transform.
    #[must_use]
    pub fn new(f: impl Fn(Vec<String>) -> Vec<String> + Send + Sync + 'static) -> Self {
        Self { apply: Box::new(f) }
    }

    /// Appends `args` after everything built so far.
    #[must_use]
    pub fn append<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        Self::new(move |mut current| {
            current.extend(args.iter().cloned());
            current
        })
    }

    /// Inserts `args` before everything built so far.
    #[must_use]
    pub fn prepend<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        Self::new(move |current| args.iter().cloned().chain(current).collect())
    }

    /// Runs the transform.
    #[must_use]
    pub fn apply(&self, args: Vec<String>) -> Vec<String> {
        (self.apply)(args)
    }
}

impl fmt::Debug for RunArgsTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunArgsTransform").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn append_keeps_existing_lines_first() {
        let t = ImageTransform::append(["RUN b"]);
        assert_eq!(t.apply(seq(&["RUN a"])), seq(&["RUN a", "RUN b"]));
        assert_eq!(t.sets(), None);
    }

    #[test]
    fn prepend_puts_new_lines_first() {
        let t = ImageTransform::prepend(["RUN x", "RUN y"]);
        assert_eq!(
            t.apply(seq(&["RUN a"])),
            seq(&["RUN x", "RUN y", "RUN a"])
        );
    }

    #[test]
    fn directive_appends_keyword_line() {
        let t = ImageTransform::directive(Directive::User, "node");
        assert_eq!(t.sets(), Some(Directive::User));
        assert_eq!(t.apply(seq(&["RUN a"])), seq(&["RUN a", "USER node"]));
    }

    #[test]
    fn transforms_are_reusable() {
        let t = RunArgsTransform::prepend(["-it"]);
        let once = t.apply(seq(&["--rm"]));
        let twice = t.apply(seq(&["--rm"]));
        assert_eq!(once, twice);
        assert_eq!(once, seq(&["-it", "--rm"]));
    }

    #[test]
    fn wrapping_transform_sees_whole_sequence() {
        let t = ImageTransform::new(|lines| {
            let mut out = vec!["# begin".to_string()];
            out.extend(lines);
            out.push("# end".to_string());
            out
        });
        assert_eq!(
            t.apply(seq(&["RUN a"])),
            seq(&["# begin", "RUN a", "# end"])
        );
    }

    #[test]
    fn run_args_append_goes_last() {
        let t = RunArgsTransform::append(["--network", "none"]);
        assert_eq!(
            t.apply(seq(&["--rm"])),
            seq(&["--rm", "--network", "none"])
        );
        assert_eq!(Directive::Cmd.to_string(), "CMD");
    }
}
