/// Categorical classification of a failure.
///
/// The short codes are logged and shown to clients, so they must never change
/// for an existing variant. New variants go at the end to keep ordinals stable.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
    strum_macros::IntoStaticStr,
    strum_macros::FromRepr,
    strum_macros::EnumIter,
)]
#[repr(u8)]
pub enum Kind {
    /// Unset. A node with this kind inherits from its cause.
    #[default]
    #[strum(serialize = "UNDEF")]
    Undefined = 0,
    #[strum(serialize = "TO001")]
    Timeout,
    #[strum(serialize = "AUTH001")]
    IncorrectAuthToken,
    #[strum(serialize = "AUTH002")]
    ActionForbidden,
    #[strum(serialize = "F001")]
    EntityNotFound,
    #[strum(serialize = "VAL001")]
    MissingFields,
    #[strum(serialize = "VAL002")]
    FieldValidation,
    #[strum(serialize = "VAL003")]
    IncorrectFieldType,
    #[strum(serialize = "CIP001")]
    CachingInProgress,
    #[strum(serialize = "HTTP001")]
    IncorrectHttpRequest,
    #[strum(serialize = "SVC001")]
    ServiceUnavailable,
}

impl Kind {
    pub fn is_defined(self) -> bool {
        self != Self::Undefined
    }

    pub fn code(self) -> &'static str {
        self.into()
    }
}
