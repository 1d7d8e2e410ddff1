/// Plain message error. Terminates a cause chain and carries no kind, op or stack.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Hash)]
#[error("{0}")]
pub struct Str(String);

impl Str {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Shorthand for [`Str::new`].
pub fn str(text: impl Into<String>) -> Str {
    Str::new(text)
}

/// Builds a [`Str`] from a format string, like `format!`.
#[macro_export]
macro_rules! errorf {
    ($($fmt:tt)+) => {
        $crate::Str::new(::std::format!($($fmt)+))
    };
}

#[cfg(test)]
mod tests {
    use super::{Str, str};

    #[test]
    fn message_is_rendered_verbatim() {
        assert_eq!(str("disk full").to_string(), "disk full");
        assert_eq!(Str::new(String::new()).to_string(), "");
    }

    #[test]
    fn errorf_formats_arguments() {
        let err = crate::errorf!("unknown type {}, value {:?}", "u8", 7);
        assert_eq!(err.as_str(), "unknown type u8, value 7");
    }
}
