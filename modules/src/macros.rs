/// Downcast an enum value to one of its variants, yielding `None` on mismatch.
///
/// Several pairs may be given at once, in which case the results are zipped:
///
/// ```ignore
/// let (client_state, header) = downcast!(
///     client_state => AnyClientState::Tendermint,
///     header => AnyHeader::Tendermint,
/// )
/// .ok_or_else(|| Error::client_args_type_mismatch(ClientType::Tendermint))?;
/// ```
#[macro_export]
macro_rules! downcast {
    ( $e1:expr => $p1:path, $( $e:expr => $p:path ),+ $(,)? ) => {
        $crate::downcast!($e1 => $p1).zip($crate::downcast!($($e => $p),+))
    };

    ($e:expr => $p:path) => {
        match $e {
            $p(e) => Some(e),
            #[allow(unreachable_patterns)]
            _ => None,
        }
    };

    () => {
        None
    };
}
