//! Model traits and the [`entity!`](crate::entity) declaration macro.

use std::any::Any;
use std::fmt;

use crate::error::ModelResult;
use crate::property::PropertyDescriptor;
use crate::record::{Record, State};

/// Object-safe view of a model instance.
///
/// Implementations are generated by [`entity!`](crate::entity); hand-written
/// implementations only need to expose their [`Record`].
pub trait Entity: Any + Send + Sync + fmt::Debug + 'static {
    fn record(&self) -> &Record;

    fn record_mut(&mut self) -> &mut Record;

    fn clone_entity(&self) -> Box<dyn Entity>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Stable class tag identifying the concrete type.
    fn class_tag(&self) -> &str {
        self.record().class_tag()
    }

    fn create_state(&self) -> State {
        self.record().create_state()
    }

    fn populate_from_state(&mut self, state: &State) -> ModelResult<()> {
        self.record_mut().populate_from_state(state)
    }
}

/// Static side of a model class: its tag, schema, and default constructor.
pub trait EntityClass: Entity + Sized {
    const CLASS_TAG: &'static str;

    fn descriptors() -> ModelResult<Vec<PropertyDescriptor>>;

    /// An instance with every property unset.
    fn new_default() -> ModelResult<Self>;

    /// Construct a default instance and populate it from `state`.
    fn from_state(state: &State) -> ModelResult<Self> {
        let mut entity = Self::new_default()?;
        entity.populate_from_state(state)?;
        Ok(entity)
    }
}

impl dyn Entity {
    pub fn is<E: Entity>(&self) -> bool {
        self.as_any().is::<E>()
    }

    pub fn downcast_ref<E: Entity>(&self) -> Option<&E> {
        self.as_any().downcast_ref::<E>()
    }

    /// Recover the concrete type, handing the box back on mismatch.
    pub fn downcast<E: Entity>(self: Box<Self>) -> Result<Box<E>, Box<dyn Entity>> {
        if !self.is::<E>() {
            return Err(self);
        }
        match self.into_any().downcast::<E>() {
            Ok(entity) => Ok(entity),
            Err(_) => unreachable!("type checked above"),
        }
    }
}

impl Clone for Box<dyn Entity> {
    fn clone(&self) -> Self {
        self.clone_entity()
    }
}

/// Declare a model struct with validated accessors.
///
/// Each property lists its public name, its type name as a string literal,
/// and the getter/setter method names:
///
/// ```
/// keel_model::entity! {
///     pub struct Point("Point") {
///         x: "Number" => get_x / set_x,
///         y: "Number" => get_y / set_y,
///     }
/// }
///
/// let mut p = Point::new().unwrap();
/// p.set_x(1).unwrap();
/// assert_eq!(p.get_x().as_f64(), Some(1.0));
/// ```
///
/// Getters return `&Value`; setters accept anything convertible into a
/// [`Value`](crate::Value) and fail with
/// [`ModelError::TypeMismatch`](crate::ModelError::TypeMismatch) when the
/// value's type differs from the declared one.
#[macro_export]
macro_rules! entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident ($tag:literal) {
            $( $field:ident : $ty:literal => $getter:ident / $setter:ident ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        $vis struct $name {
            record: $crate::Record,
        }

        #[allow(dead_code)]
        impl $name {
            /// Create an instance with every property unset.
            pub fn new() -> $crate::ModelResult<Self> {
                <Self as $crate::EntityClass>::new_default()
            }

            $(
                pub fn $getter(&self) -> &$crate::Value {
                    self.record.value(stringify!($field))
                }

                pub fn $setter(
                    &mut self,
                    value: impl ::core::convert::Into<$crate::Value>,
                ) -> $crate::ModelResult<()> {
                    self.record.set(stringify!($field), value)
                }
            )*
        }

        impl $crate::Entity for $name {
            fn record(&self) -> &$crate::Record {
                &self.record
            }

            fn record_mut(&mut self) -> &mut $crate::Record {
                &mut self.record
            }

            fn clone_entity(&self) -> ::std::boxed::Box<dyn $crate::Entity> {
                ::std::boxed::Box::new(::core::clone::Clone::clone(self))
            }

            fn as_any(&self) -> &dyn ::core::any::Any {
                self
            }

            fn into_any(
                self: ::std::boxed::Box<Self>,
            ) -> ::std::boxed::Box<dyn ::core::any::Any> {
                self
            }
        }

        impl $crate::EntityClass for $name {
            const CLASS_TAG: &'static str = $tag;

            fn descriptors() -> $crate::ModelResult<::std::vec::Vec<$crate::PropertyDescriptor>> {
                ::core::result::Result::Ok(::std::vec![
                    $( $crate::PropertyDescriptor::parse(stringify!($field), $ty)?, )*
                ])
            }

            fn new_default() -> $crate::ModelResult<Self> {
                let record = $crate::Record::new(
                    <Self as $crate::EntityClass>::CLASS_TAG,
                    <Self as $crate::EntityClass>::descriptors()?,
                )?;
                ::core::result::Result::Ok(Self { record })
            }
        }
    };
}

entity! {
    /// The property-less base model, class tag `"Model"`.
    ///
    /// A property declared as `"Model"` accepts exactly this type.
    pub struct BaseModel("Model") {}
}
