//! Width/signedness configurations.
//!
//! Each of the eight C integer configurations is a zero-sized marker type
//! implementing [`Width`]. The marker names the primitive value type (the
//! platform's `c_short`, `c_uint`, `c_long`, ...) and its [`WidthKind`], so
//! the configuration is fixed at compile time and two configurations that
//! happen to share a primitive (e.g. `long` and `long long` on LP64) stay
//! distinct types.

use core::ffi::{c_int, c_long, c_longlong, c_short, c_uint, c_ulong, c_ulonglong, c_ushort};
use core::fmt;
use core::str::FromStr;

use crate::error::AtomicError;
use crate::primitive::AtomicPrimitive;

/// The closed set of supported integer configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WidthKind {
    /// `short`
    Short,
    /// `unsigned short`
    UShort,
    /// `int`
    Int,
    /// `unsigned int`
    UInt,
    /// `long`
    Long,
    /// `unsigned long`
    ULong,
    /// `long long`
    LongLong,
    /// `unsigned long long`
    ULongLong,
}

impl WidthKind {
    /// Every configuration, signed before unsigned, narrowest first.
    pub const ALL: [WidthKind; 8] = [
        WidthKind::Short,
        WidthKind::UShort,
        WidthKind::Int,
        WidthKind::UInt,
        WidthKind::Long,
        WidthKind::ULong,
        WidthKind::LongLong,
        WidthKind::ULongLong,
    ];

    /// The C type name, e.g. `"unsigned long long"`.
    pub const fn name(self) -> &'static str {
        match self {
            WidthKind::Short => "short",
            WidthKind::UShort => "unsigned short",
            WidthKind::Int => "int",
            WidthKind::UInt => "unsigned int",
            WidthKind::Long => "long",
            WidthKind::ULong => "unsigned long",
            WidthKind::LongLong => "long long",
            WidthKind::ULongLong => "unsigned long long",
        }
    }

    /// Whether values are two's-complement signed.
    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            WidthKind::Short | WidthKind::Int | WidthKind::Long | WidthKind::LongLong
        )
    }

    /// Width in bits on the current target.
    pub const fn bits(self) -> u32 {
        match self {
            WidthKind::Short => c_short::BITS,
            WidthKind::UShort => c_ushort::BITS,
            WidthKind::Int => c_int::BITS,
            WidthKind::UInt => c_uint::BITS,
            WidthKind::Long => c_long::BITS,
            WidthKind::ULong => c_ulong::BITS,
            WidthKind::LongLong => c_longlong::BITS,
            WidthKind::ULongLong => c_ulonglong::BITS,
        }
    }

    /// Smallest representable value.
    pub const fn min_value(self) -> i128 {
        match self {
            WidthKind::Short => c_short::MIN as i128,
            WidthKind::Int => c_int::MIN as i128,
            WidthKind::Long => c_long::MIN as i128,
            WidthKind::LongLong => c_longlong::MIN as i128,
            WidthKind::UShort | WidthKind::UInt | WidthKind::ULong | WidthKind::ULongLong => 0,
        }
    }

    /// Largest representable value.
    pub const fn max_value(self) -> i128 {
        match self {
            WidthKind::Short => c_short::MAX as i128,
            WidthKind::UShort => c_ushort::MAX as i128,
            WidthKind::Int => c_int::MAX as i128,
            WidthKind::UInt => c_uint::MAX as i128,
            WidthKind::Long => c_long::MAX as i128,
            WidthKind::ULong => c_ulong::MAX as i128,
            WidthKind::LongLong => c_longlong::MAX as i128,
            WidthKind::ULongLong => c_ulonglong::MAX as i128,
        }
    }

    /// Whether `value` is representable in this configuration.
    pub const fn contains(self, value: i128) -> bool {
        value >= self.min_value() && value <= self.max_value()
    }
}

impl fmt::Display for WidthKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WidthKind {
    type Err = AtomicError;

    /// Parses a C type name. Runs of whitespace are treated as one space, so
    /// `"unsigned  long"` is accepted; anything else outside the eight names
    /// is a [`AtomicError::TypeConfiguration`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        WidthKind::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| AtomicError::type_configuration(s))
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A compile-time integer configuration.
///
/// Sealed; the implementors are the eight marker types in this module.
pub trait Width: sealed::Sealed + Copy + Default + Send + Sync + 'static {
    /// Primitive integer stored in cells of this configuration.
    type Value: AtomicPrimitive;

    /// Runtime description of the configuration.
    const KIND: WidthKind;
}

macro_rules! define_widths {
    ($($(#[$doc:meta])* $marker:ident => $value:ty;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            pub struct $marker;

            impl sealed::Sealed for $marker {}

            impl Width for $marker {
                type Value = $value;
                const KIND: WidthKind = WidthKind::$marker;
            }

            const _: () = {
                assert!(<$value>::BITS == WidthKind::$marker.bits());
                assert!(<$value>::MIN as i128 == WidthKind::$marker.min_value());
                assert!(<$value>::MAX as i128 == WidthKind::$marker.max_value());
            };
        )*
    };
}

define_widths! {
    /// `short` (`c_short`).
    Short => c_short;
    /// `unsigned short` (`c_ushort`).
    UShort => c_ushort;
    /// `int` (`c_int`).
    Int => c_int;
    /// `unsigned int` (`c_uint`).
    UInt => c_uint;
    /// `long` (`c_long`).
    Long => c_long;
    /// `unsigned long` (`c_ulong`).
    ULong => c_ulong;
    /// `long long` (`c_longlong`).
    LongLong => c_longlong;
    /// `unsigned long long` (`c_ulonglong`).
    ULongLong => c_ulonglong;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in WidthKind::ALL {
            assert_eq!(kind.name().parse::<WidthKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn from_str_tolerates_whitespace() {
        assert_eq!(" unsigned   short ".parse::<WidthKind>(), Ok(WidthKind::UShort));
    }

    #[test]
    fn from_str_rejects_unknown_names() {
        let err = "unsigned char".parse::<WidthKind>().unwrap_err();
        assert!(err.is_type_configuration());
        assert!("".parse::<WidthKind>().is_err());
    }

    #[test]
    fn unsigned_int_is_not_short() {
        assert_eq!(UInt::KIND, WidthKind::UInt);
        assert_eq!(WidthKind::UInt.bits(), c_uint::BITS);
        assert_eq!(WidthKind::UInt.max_value(), i128::from(c_uint::MAX));
    }

    #[test]
    fn bounds_and_signedness() {
        assert_eq!(WidthKind::UShort.min_value(), 0);
        assert_eq!(WidthKind::UShort.max_value(), 65_535);
        assert_eq!(WidthKind::Short.min_value(), -32_768);
        assert!(WidthKind::Short.is_signed());
        assert!(!WidthKind::ULongLong.is_signed());
        assert!(WidthKind::UShort.contains(0));
        assert!(WidthKind::UShort.contains(65_535));
        assert!(!WidthKind::UShort.contains(-1));
        assert!(!WidthKind::UShort.contains(65_536));
        assert_eq!(WidthKind::ULongLong.max_value(), i128::from(u64::MAX));
    }
}
