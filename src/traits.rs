use indexmap::IndexMap;

use crate::{FieldErrorKind, FieldErrors, Path, Value};

/// Core trait for types that can be read from and written to a form value.
///
/// Implement it with `#[derive(Form)]` for structs; leaf impls are provided
/// for strings, numbers, `bool`, `Option` and `Vec`.
pub trait FormValue: Sized {
    /// Reads a `Self` from `value`, the data submitted at `path` (`None` when
    /// nothing was submitted, and `path` is `None` at the root).
    ///
    /// Failures are reported into `errors` and yield `None`, so that one call
    /// collects every problem in the form rather than stopping at the first.
    fn from_form(value: Option<&Value>, path: Option<&Path>, errors: &mut FieldErrors)
    -> Option<Self>;

    /// Converts `self` into a value, or `None` when nothing should be
    /// submitted (an unchecked box, an empty `Option`).
    fn to_form(&self) -> Option<Value>;
}

/// Reads a typed value from a decoded form, or returns every field error.
pub fn from_value<T: FormValue>(value: &Value) -> Result<T, FieldErrors> {
    let mut errors = FieldErrors::new();
    match T::from_form(Some(value), None, &mut errors) {
        Some(result) if errors.is_empty() => Ok(result),
        _ => Err(errors),
    }
}

/// Converts a typed value into a form value ready for encoding.
pub fn to_value<T: FormValue>(value: &T) -> Value {
    value.to_form().unwrap_or_default()
}

/// Returns the submitted string, reporting blank or missing input.
fn required<'a>(
    value: Option<&'a Value>,
    path: Option<&Path>,
    errors: &mut FieldErrors,
) -> Option<&'a str> {
    match value {
        Some(Value::Scalar(s)) if !s.is_empty() => Some(s),
        None | Some(Value::Scalar(_)) => {
            errors.report(path, FieldErrorKind::Required);
            None
        }
        Some(other) => {
            errors.report(path, expected("scalar", other));
            None
        }
    }
}

fn expected(expected: &'static str, actual: &Value) -> FieldErrorKind {
    FieldErrorKind::Expected {
        expected,
        actual: actual.kind_name(),
    }
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::Scalar(s)) => s.is_empty(),
        Some(_) => false,
    }
}

impl FormValue for String {
    fn from_form(
        value: Option<&Value>,
        path: Option<&Path>,
        errors: &mut FieldErrors,
    ) -> Option<Self> {
        required(value, path, errors).map(str::to_string)
    }

    fn to_form(&self) -> Option<Value> {
        Some(Value::Scalar(self.clone()))
    }
}

/// The raw submitted value, for fields read without a fixed shape.
impl FormValue for Value {
    fn from_form(
        value: Option<&Value>,
        path: Option<&Path>,
        errors: &mut FieldErrors,
    ) -> Option<Self> {
        match value {
            Some(value) => Some(value.clone()),
            None => {
                errors.report(path, FieldErrorKind::Required);
                None
            }
        }
    }

    fn to_form(&self) -> Option<Value> {
        Some(self.clone())
    }
}

/// A checkbox: checked if anything was submitted. A blank value reads as
/// unchecked, which is how an unchecked box inside a list is written.
impl FormValue for bool {
    fn from_form(
        value: Option<&Value>,
        _path: Option<&Path>,
        _errors: &mut FieldErrors,
    ) -> Option<Self> {
        Some(!is_blank(value))
    }

    fn to_form(&self) -> Option<Value> {
        self.then(|| Value::from("on"))
    }
}

macro_rules! impl_form_value_number {
    ($ty:ty) => {
        impl FormValue for $ty {
            fn from_form(
                value: Option<&Value>,
                path: Option<&Path>,
                errors: &mut FieldErrors,
            ) -> Option<Self> {
                let s = required(value, path, errors)?;
                match s.trim().parse::<$ty>() {
                    Ok(n) => Some(n),
                    Err(_) => {
                        errors.report(path, FieldErrorKind::InvalidNumber(s.to_string()));
                        None
                    }
                }
            }

            fn to_form(&self) -> Option<Value> {
                Some(Value::Scalar(self.to_string()))
            }
        }
    };
}

impl_form_value_number!(u8);
impl_form_value_number!(u16);
impl_form_value_number!(u32);
impl_form_value_number!(u64);
impl_form_value_number!(usize);
impl_form_value_number!(i8);
impl_form_value_number!(i16);
impl_form_value_number!(i32);
impl_form_value_number!(i64);
impl_form_value_number!(isize);
impl_form_value_number!(f32);
impl_form_value_number!(f64);

/// An optional field: absent or blank input reads as `None`.
impl<T: FormValue> FormValue for Option<T> {
    fn from_form(
        value: Option<&Value>,
        path: Option<&Path>,
        errors: &mut FieldErrors,
    ) -> Option<Self> {
        if is_blank(value) {
            return Some(None);
        }
        T::from_form(value, path, errors).map(Some)
    }

    fn to_form(&self) -> Option<Value> {
        self.as_ref().and_then(T::to_form)
    }
}

/// A repeated field. A single submitted value reads as a one-element list,
/// and nothing submitted reads as an empty one.
impl<T: FormValue> FormValue for Vec<T> {
    fn from_form(
        value: Option<&Value>,
        path: Option<&Path>,
        errors: &mut FieldErrors,
    ) -> Option<Self> {
        read_list::<T, _>(value, path, errors)
    }

    fn to_form(&self) -> Option<Value> {
        Some(Value::List(self.iter().map(list_element).collect()))
    }
}

/// Writes one list element. Elements that submit nothing keep their
/// position as a blank scalar, which `Option` and `bool` read back as empty.
fn list_element<T: FormValue>(item: &T) -> Value {
    item.to_form().unwrap_or_else(|| Value::Scalar(String::new()))
}

fn read_list<T: FormValue, C: FromIterator<T>>(
    value: Option<&Value>,
    path: Option<&Path>,
    errors: &mut FieldErrors,
) -> Option<C> {
    let items = match value {
        None => return Some(std::iter::empty::<T>().collect()),
        Some(Value::List(items)) => items,
        Some(single) => {
            return T::from_form(Some(single), path, errors).map(|v| std::iter::once(v).collect());
        }
    };

    let mut ok = true;
    let mut result = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_path = path.map(|p| p.join_index(index));
        match T::from_form(Some(item), item_path.as_ref(), errors) {
            Some(v) => result.push(v),
            None => ok = false,
        }
    }
    ok.then(|| result.into_iter().collect())
}

#[cfg(feature = "smallvec")]
impl<A> FormValue for smallvec::SmallVec<A>
where
    A: smallvec::Array,
    A::Item: FormValue,
{
    fn from_form(
        value: Option<&Value>,
        path: Option<&Path>,
        errors: &mut FieldErrors,
    ) -> Option<Self> {
        read_list::<A::Item, _>(value, path, errors)
    }

    fn to_form(&self) -> Option<Value> {
        Some(Value::List(self.iter().map(list_element).collect()))
    }
}

/// A date input, submitted as `YYYY-MM-DD`.
#[cfg(feature = "chrono")]
impl FormValue for chrono::NaiveDate {
    fn from_form(
        value: Option<&Value>,
        path: Option<&Path>,
        errors: &mut FieldErrors,
    ) -> Option<Self> {
        let s = required(value, path, errors)?;
        match chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.report(path, FieldErrorKind::InvalidDate(s.to_string()));
                None
            }
        }
    }

    fn to_form(&self) -> Option<Value> {
        Some(Value::Scalar(self.format("%Y-%m-%d").to_string()))
    }
}

#[doc(hidden)]
pub struct StructReader<'a> {
    fields: Option<&'a IndexMap<String, Value>>,
    path: Option<&'a Path>,
}

impl<'a> StructReader<'a> {
    /// Starts reading a struct. A missing object reads as one with no fields,
    /// so its required fields report individually.
    #[doc(hidden)]
    pub fn new(
        value: Option<&'a Value>,
        path: Option<&'a Path>,
        errors: &mut FieldErrors,
    ) -> Option<Self> {
        let fields = match value {
            None => None,
            Some(Value::Object(fields)) => Some(fields),
            Some(other) => {
                errors.report(path, expected("object", other));
                return None;
            }
        };
        Some(StructReader { fields, path })
    }

    #[doc(hidden)]
    pub fn read<T: FormValue>(&self, name: &str, errors: &mut FieldErrors) -> Option<T> {
        let path = match self.path {
            Some(parent) => parent.join_field(name),
            None => Path::field(name),
        };
        let value = self.fields.and_then(|fields| fields.get(name));
        T::from_form(value, Some(&path), errors)
    }
}

#[doc(hidden)]
#[derive(Default)]
pub struct StructWriter {
    fields: IndexMap<String, Value>,
}

impl StructWriter {
    #[doc(hidden)]
    pub fn new() -> Self {
        Self::default()
    }

    #[doc(hidden)]
    pub fn write<T: FormValue>(&mut self, name: &str, value: &T) {
        if let Some(value) = value.to_form() {
            self.fields.insert(name.to_string(), value);
        }
    }

    #[doc(hidden)]
    pub fn finish(self) -> Value {
        Value::Object(self.fields)
    }
}
