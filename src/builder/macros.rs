//! Macros for ergonomic machine construction.

/// Generate a `State` implementation for a simple enum.
///
/// # Example
///
/// ```
/// use machina::state_enum;
/// use machina::core::State;
///
/// state_enum! {
///     pub enum FetchState {
///         Idle,
///         Loading,
///         Done,
///     }
///     final: [Done]
/// }
///
/// assert_eq!(FetchState::Loading.name(), "Loading");
/// assert!(FetchState::Done.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }
        }
    };
}

/// Generate an `Event` implementation for a simple enum.
///
/// # Example
///
/// ```
/// use machina::event_enum;
/// use machina::core::Event;
///
/// event_enum! {
///     pub enum FetchEvent {
///         Fetch,
///         Resolve,
///         Reject,
///     }
/// }
///
/// assert_eq!(FetchEvent::Resolve.name(), "Resolve");
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::Event for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

/// Generate a context struct, its patch struct and a field-wise shallow
/// merge.
///
/// Every field of the patch is an `Option`; `Some` overwrites the field,
/// `None` keeps it.
///
/// # Example
///
/// ```
/// use machina::context_struct;
/// use machina::core::Context;
///
/// context_struct! {
///     pub struct Form {
///         pub attempts: u32,
///         pub error: Option<String>,
///     }
///     patch: FormPatch
/// }
///
/// let mut form = Form { attempts: 1, error: None };
/// form.merge(FormPatch { attempts: Some(2), ..Default::default() });
/// assert_eq!(form, Form { attempts: 2, error: None });
/// ```
#[macro_export]
macro_rules! context_struct {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
        patch: $patch:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty
            ),*
        }

        #[doc = concat!("Partial update for [`", stringify!($name), "`].")]
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $patch {
            $(
                $field_vis $field: ::core::option::Option<$ty>
            ),*
        }

        impl $crate::core::Context for $name {
            type Patch = $patch;

            fn merge(&mut self, patch: $patch) {
                $(
                    if let ::core::option::Option::Some(value) = patch.$field {
                        self.$field = value;
                    }
                )*
            }
        }
    };
}
