use std::error::Error as StdError;

use crate::error::{Cause, Error};
use crate::kind::Kind;

/// Structural comparison for assertions.
///
/// Both values must be [`Error`]s. Every field set on `template` must be equal
/// on `candidate`; unset fields (empty op, [`Kind::Undefined`], no cause) match
/// anything. A structured cause on the template is compared recursively, a
/// leaf cause by message. Stacks are ignored.
pub fn matches(template: &(dyn StdError + 'static), candidate: &(dyn StdError + 'static)) -> bool {
    let (Some(template), Some(candidate)) = (
        template.downcast_ref::<Error>(),
        candidate.downcast_ref::<Error>(),
    ) else {
        return false;
    };
    template.matches(candidate)
}

/// Whether `err` is an [`Error`] whose kind, resolved down the chain, is `kind`.
///
/// A node with an unset kind defers to its structured cause; the search stops
/// at the first defined kind, at a leaf cause, or at the end of the chain.
pub fn is(kind: Kind, err: &(dyn StdError + 'static)) -> bool {
    err.downcast_ref::<Error>()
        .is_some_and(|err| err.is_kind(kind))
}

impl Error {
    /// Method form of [`matches`] with `self` as the template.
    pub fn matches(&self, candidate: &Error) -> bool {
        if !self.op.is_empty() && candidate.op != self.op {
            return false;
        }
        if self.kind.is_defined() && candidate.kind != self.kind {
            return false;
        }
        match &self.cause {
            None => true,
            Some(Cause::Error(template)) => candidate
                .cause_error()
                .is_some_and(|candidate| template.matches(candidate)),
            Some(Cause::Leaf(leaf)) => candidate
                .cause
                .as_ref()
                .is_some_and(|cause| cause.message() == leaf.to_string()),
        }
    }

    /// Method form of [`is`].
    pub fn is_kind(&self, kind: Kind) -> bool {
        self.resolved_kind() == kind && kind.is_defined()
    }
}

#[cfg(test)]
mod tests {
    use super::{is, matches};
    use crate::arg::Arg;
    use crate::error::{Error, op};
    use crate::kind::Kind;
    use crate::leaf::str;
    use crate::stack::no_stack;

    fn build(args: Vec<Arg>) -> Error {
        Error::from_args_in(no_stack(), args)
    }

    fn sample() -> Error {
        let inner = build(vec![op("open").into(), "disk full".into()]);
        build(vec![op("save").into(), Kind::EntityNotFound.into(), inner.into()])
    }

    #[test]
    fn unset_template_fields_are_wildcards() {
        let candidate = sample();
        assert!(matches(&build(vec![Kind::EntityNotFound.into()]), &candidate));
        assert!(matches(&build(vec![op("save").into()]), &candidate));
        assert!(matches(&candidate.clone(), &candidate));
    }

    #[test]
    fn set_fields_must_agree() {
        let candidate = sample();
        assert!(!matches(&build(vec![Kind::Timeout.into()]), &candidate));
        assert!(!matches(&build(vec![op("load").into()]), &candidate));
    }

    #[test]
    fn structured_causes_are_compared_recursively() {
        let candidate = sample();
        let template_inner = build(vec![op("open").into()]);
        let template = build(vec![op("save").into(), template_inner.into()]);
        assert!(matches(&template, &candidate));

        let wrong_inner = build(vec![op("close").into()]);
        let template = build(vec![op("save").into(), wrong_inner.into()]);
        assert!(!matches(&template, &candidate));

        let flat = build(vec![op("save").into()]);
        let template = build(vec![op("save").into(), build(vec![op("open").into()]).into()]);
        assert!(!matches(&template, &flat));
    }

    #[test]
    fn leaf_causes_are_compared_by_message() {
        let candidate = build(vec![op("open").into(), "disk full".into()]);
        assert!(matches(&build(vec!["disk full".into()]), &candidate));
        assert!(!matches(&build(vec!["disk empty".into()]), &candidate));
        assert!(!matches(
            &build(vec!["disk full".into()]),
            &build(vec![op("open").into()])
        ));
    }

    #[test]
    fn non_structured_values_never_match() {
        let leaf = str("disk full");
        assert!(!matches(&leaf, &sample()));
        assert!(!matches(&sample(), &leaf));
    }

    #[test]
    fn is_resolves_kind_down_the_chain() {
        let inner = build(vec![Kind::Timeout.into(), "slow".into()]);
        let outer = build(vec![op("fetch").into(), inner.into()]);
        assert!(is(Kind::Timeout, &outer));
        assert!(!is(Kind::ServiceUnavailable, &outer));
        assert!(!is(Kind::Timeout, &str("slow")));
    }

    #[test]
    fn is_stops_at_first_defined_kind() {
        let inner = build(vec![Kind::Timeout.into()]);
        let outer = build(vec![Kind::ServiceUnavailable.into(), inner.into()]);
        assert!(is(Kind::ServiceUnavailable, &outer));
        assert!(!is(Kind::Timeout, &outer));
    }

    #[test]
    fn is_never_reports_undefined() {
        let err = build(vec!["plain".into()]);
        assert!(!is(Kind::Undefined, &err));
    }
}
