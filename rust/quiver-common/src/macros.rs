/// Unwraps a `Result` inside a function returning `Option<Result<T, E>>`.
///
/// `Ok(t)` yields `t`; `Err(e)` returns `Some(Err(e))` from the enclosing
/// function. Meant for `Iterator::next` implementations whose items are
/// `Result`s, such as row iterators that pull from a fallible cursor.
#[macro_export]
macro_rules! try_or_ret_some_err {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(err) => {
                return Some(Err(err.into()));
            }
        }
    };
}
