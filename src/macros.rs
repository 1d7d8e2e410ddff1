/// Builds an [`Error`](crate::Error) from any mix of arguments convertible to
/// [`Arg`](crate::Arg), in any order.
///
/// ```
/// use chainerr::{Kind, e, op};
///
/// let err = e!(op("user.save"), Kind::EntityNotFound, "no such row");
/// assert!(chainerr::is(Kind::EntityNotFound, &err));
/// ```
///
/// `e!()` compiles but panics at runtime: an error with nothing in it is a bug
/// at the call site.
#[macro_export]
macro_rules! e {
    () => {
        $crate::Error::from_args(::std::vec::Vec::<$crate::Arg>::new())
    };
    ($($arg:expr),+ $(,)?) => {
        $crate::Error::from_args([$($crate::Arg::from($arg)),+])
    };
}
