/// Declares the static global `OOK_DECODER` singleton behind a
/// `critical_section` mutex.
///
/// Use where both the capture ISR and the polling loop need access to the
/// same decoder.
///
/// # Arguments
/// - `$protocol`: the concrete [`OokProtocol`](crate::decoder::OokProtocol)
///   type of the decoder (e.g. [`OregonV3`](crate::oregon::OregonV3))
///
/// # Example
/// ```rust
/// use ook433::init_ook_decoder;
/// use ook433::oregon::OregonV3;
///
/// init_ook_decoder!(OregonV3);
/// ```
#[macro_export]
macro_rules! init_ook_decoder {
    ( $protocol:ty ) => {
        pub static OOK_DECODER: $crate::critical_section::Mutex<
            core::cell::RefCell<Option<$crate::decoder::OokDecoder<$protocol>>>,
        > = $crate::critical_section::Mutex::new(core::cell::RefCell::new(None));
    };
}

/// Installs a decoder into the `OOK_DECODER` singleton declared by
/// [`init_ook_decoder!`](crate::init_ook_decoder).
///
/// # Example
/// ```rust,ignore
/// fn main() {
///     setup_ook_decoder!(OregonV3);
/// }
/// ```
#[macro_export]
macro_rules! setup_ook_decoder {
    ( $protocol:expr ) => {
        $crate::handoff::global_decoder_setup(&OOK_DECODER, $protocol)
    };
}

/// Feeds one pulse width to the `OOK_DECODER` singleton; returns whether a
/// frame is now complete.
///
/// Intended to be invoked from the edge-capture ISR with the measured
/// width. Silently reports `false` if the decoder has not been set up.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn GPIO() {
///     let _ = feed_ook_pulse!(width_us);
/// }
/// ```
#[macro_export]
macro_rules! feed_ook_pulse {
    ( $width_us:expr ) => {
        $crate::handoff::global_decoder_feed(&OOK_DECODER, $width_us)
    };
}

/// Takes the completed frame out of the `OOK_DECODER` singleton, resetting
/// it for the next attempt. Returns `Option<Frame>`.
///
/// # Example
/// ```rust,ignore
/// if let Some(frame) = take_ook_frame!() {
///     // interpret the telegram
/// }
/// ```
#[macro_export]
macro_rules! take_ook_frame {
    () => {
        $crate::handoff::global_decoder_take(&OOK_DECODER)
    };
}

#[cfg(test)]
mod tests {
    use crate::oregon::OregonV3;

    init_ook_decoder!(OregonV3);

    #[test]
    fn test_macro_wrappers_round_trip() {
        setup_ook_decoder!(OregonV3);
        for _ in 0..33 {
            assert!(!feed_ook_pulse!(900));
        }
        assert!(!feed_ook_pulse!(300));
        for _ in 0..51 {
            let _ = feed_ook_pulse!(300);
            let _ = feed_ook_pulse!(300);
        }
        assert!(feed_ook_pulse!(1500));
        let frame = take_ook_frame!().unwrap();
        assert_eq!(frame.len(), 7);
        assert!(take_ook_frame!().is_none());
    }
}
