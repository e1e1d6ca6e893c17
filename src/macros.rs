//! The `macros` module provides macros for internal use.

/// A macro for conveniently writing bytes to a `Write` object and converting the error.
macro_rules! write_u8 {
    ($w:expr, $val:expr) => {
        $w.write_all(&[$val]).context(wr!())
    };
}

/// Example: clamp!(Division, u16, 1, 32767, 1024, pub);
/// Where:
/// - Division is the name of the struct that will be created.
/// - u16 is the underlying data type
/// - 1 is the minimum allowed value
/// - 32767 is the maximum allowed value
/// - 1024 is the default value
/// - pub is the visibility of the struct
macro_rules! clamp {
    (
        $(#[$meta:meta])*
        $symbol:ident, $inner_type:ty, $min:expr, $max:expr, $default:expr, $visibility:vis
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
        $visibility struct $symbol($inner_type);

        impl Default for $symbol {
            fn default() -> Self {
                Self::new($default)
            }
        }

        impl $symbol {
            /// Silently clamps the value if it is out of range. See [`Self::set`].
            #[allow(dead_code)]
            $visibility const fn new(value: $inner_type) -> Self {
                let (clamped, _) = Self::clamp(value);
                Self(clamped)
            }

            /// Returns the inner value.
            #[allow(dead_code)]
            $visibility fn get(&self) -> $inner_type {
                self.0
            }

            /// Clamps and sets. Returns `true` if `value` was in range. Returns `false` if `value`
            /// was out-of-range. That is, given a valid range of `1..=5`, then `set(0)` will set
            /// the value to `1` and return `false`. `set(4)` will set the value to `4` and return
            /// `true`.
            #[allow(dead_code)]
            $visibility fn set(&mut self, value: $inner_type) -> bool {
                let (clamped, result) = Self::clamp(value);
                self.0 = clamped;
                result
            }

            /// A private const function that does the clamping.
            #[allow(unused_comparisons)]
            const fn clamp(value: $inner_type) -> ($inner_type, bool) {
                if value < $min {
                    ($min, false)
                } else if value > $max {
                    ($max, false)
                } else {
                    (value, true)
                }
            }
        }

        impl From<$inner_type> for $symbol {
            fn from(value: $inner_type) -> Self {
                Self::new(value)
            }
        }

        impl From<$symbol> for $inner_type {
            fn from(value: $symbol) -> $inner_type {
                value.0
            }
        }

        impl std::fmt::Display for $symbol {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

/// Like `clamp!` but for the 7-bit (and 4-bit) values MIDI packs into data
/// bytes, which mask instead of clamping. Example: masked!(Velocity, 0x7F, 72, pub);
/// Where:
/// - Velocity is the name of the struct that will be created.
/// - 0x7F is the mask applied on construction
/// - 72 is the default value
/// - pub is the visibility of the struct
macro_rules! masked {
    (
        $(#[$meta:meta])*
        $symbol:ident, $mask:expr, $default:expr, $visibility:vis
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Hash)]
        $visibility struct $symbol(u8);

        impl Default for $symbol {
            fn default() -> Self {
                Self::new($default)
            }
        }

        impl $symbol {
            /// Masks out any bits beyond the value's width.
            #[allow(dead_code)]
            $visibility const fn new(value: u8) -> Self {
                Self(value & $mask)
            }

            /// Returns the inner value.
            #[allow(dead_code)]
            $visibility const fn get(&self) -> u8 {
                self.0
            }

            /// Masks and sets.
            #[allow(dead_code)]
            $visibility fn set(&mut self, value: u8) {
                self.0 = value & $mask;
            }
        }

        impl From<u8> for $symbol {
            fn from(value: u8) -> Self {
                Self::new(value)
            }
        }

        impl From<$symbol> for u8 {
            fn from(value: $symbol) -> u8 {
                value.0
            }
        }

        impl std::fmt::Display for $symbol {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

#[test]
#[allow(clippy::disallowed_names)]
fn clamp_test() {
    clamp!(Foo, u8, 1, 16, 1, pub);
    let foo: Foo = 0u8.into();
    let foo_val: u8 = foo.into();
    assert_eq!(1, foo_val);
    let fmted = format!("{}", Foo::new(6));
    assert_eq!("6", fmted.as_str());
}

#[test]
#[allow(clippy::disallowed_names)]
fn masked_test() {
    masked!(Bar, 0x7F, 0, pub);
    let bar: Bar = 0x85u8.into();
    assert_eq!(0x05, bar.get());
    let mut bar = Bar::default();
    bar.set(0xFF);
    assert_eq!(0x7F, bar.get());
}
