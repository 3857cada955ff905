//! Helper macro for generating domain port error enums.
//!
//! Each port declares its failures with `define_port_error!`, which expands
//! to a `thiserror` enum plus snake_case constructor functions whose
//! parameters accept `impl Into<FieldType>`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        pub enum ExamplePortError {
            Timeout => "operation timed out",
            Rejected { reason: String } => "rejected: {reason}",
            OutOfRange { field: String, limit: u32 } => "{field} exceeds {limit}",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        let err = ExamplePortError::timeout();
        assert_eq!(err.to_string(), "operation timed out");
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = ExamplePortError::rejected("busy");
        assert_eq!(err.to_string(), "rejected: busy");
    }

    #[test]
    fn constructors_support_mixed_fields() {
        let err = ExamplePortError::out_of_range("retries", 3_u32);
        assert_eq!(err.to_string(), "retries exceeds 3");
    }
}
