//! Checkout form validation.
//!
//! Validation is synchronous and cheap enough to re-run on every keystroke.
//! Errors are attached to individual fields; a form with any error cannot be
//! submitted.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use quickshop_core::{Email, Phone};
use serde::{Deserialize, Serialize};

/// Raw checkout form values as typed by the shopper.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl CheckoutForm {
    fn value(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Address => &self.address,
        }
    }

    fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Address => &mut self.address,
        }
    }
}

/// A checkout form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Phone,
    Address,
}

impl Field {
    /// Every field, in form order.
    pub const ALL: [Self; 4] = [Self::Name, Self::Email, Self::Phone, Self::Address];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-readable error messages keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<Field, String>);

impl FieldErrors {
    /// The message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Failed fields and their messages, in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

/// Validated shopper contact and shipping details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: String,
    pub email: Email,
    pub phone: Phone,
    pub address: String,
}

/// Check a single field, returning its error message if it fails.
#[must_use]
pub fn validate_field(form: &CheckoutForm, field: Field) -> Option<String> {
    let value = form.value(field);
    let failure = match field {
        Field::Name => required(value, "Name is required").err(),
        Field::Email => parse_email(value).err(),
        Field::Phone => parse_phone(value).err(),
        Field::Address => required(value, "Address is required").err(),
    };
    failure.map(str::to_string)
}

/// Validate every field.
///
/// Values are kept verbatim in the returned [`ContactInfo`].
///
/// # Errors
///
/// Returns the message for every failing field.
pub fn validate(form: &CheckoutForm) -> Result<ContactInfo, FieldErrors> {
    let name = required(&form.name, "Name is required");
    let email = parse_email(&form.email);
    let phone = parse_phone(&form.phone);
    let address = required(&form.address, "Address is required");

    match (name, email, phone, address) {
        (Ok(()), Ok(email), Ok(phone), Ok(())) => Ok(ContactInfo {
            name: form.name.clone(),
            email,
            phone,
            address: form.address.clone(),
        }),
        (name, email, phone, address) => Err(FieldErrors(
            [
                (Field::Name, name.err()),
                (Field::Email, email.err()),
                (Field::Phone, phone.err()),
                (Field::Address, address.err()),
            ]
            .into_iter()
            .filter_map(|(field, msg)| msg.map(|msg| (field, msg.to_string())))
            .collect(),
        )),
    }
}

fn required(value: &str, message: &'static str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        Err(message)
    } else {
        Ok(())
    }
}

fn parse_email(value: &str) -> Result<Email, &'static str> {
    if value.is_empty() {
        return Err("Email is required");
    }
    Email::parse(value).map_err(|_| "Invalid email")
}

fn parse_phone(value: &str) -> Result<Phone, &'static str> {
    if value.is_empty() {
        return Err("Phone number is required");
    }
    Phone::parse(value).map_err(|_| "Phone number must be 11 digits")
}

/// Live checkout form: values, per-field errors, and which fields the
/// shopper has touched.
///
/// Errors are recomputed on every change but only shown for touched fields,
/// so an untouched form does not open covered in red. Submitting touches
/// every field.
#[derive(Debug, Clone, Default)]
pub struct CheckoutFormState {
    form: CheckoutForm,
    errors: FieldErrors,
    touched: BTreeSet<Field>,
}

impl CheckoutFormState {
    /// An empty form. Every field starts out failing but untouched.
    #[must_use]
    pub fn new() -> Self {
        let form = CheckoutForm::default();
        let errors = validate(&form).err().unwrap_or_default();
        Self {
            form,
            errors,
            touched: BTreeSet::new(),
        }
    }

    /// Update one field and re-run validation.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.form.value_mut(field) = value.into();
        self.touched.insert(field);
        self.revalidate();
    }

    /// Error to display next to `field`, if it is touched and failing.
    #[must_use]
    pub fn visible_error(&self, field: Field) -> Option<&str> {
        if self.touched.contains(&field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    /// All current errors, touched or not.
    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Whether the form is valid and may be submitted.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub const fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Touch every field and validate.
    ///
    /// # Errors
    ///
    /// Returns the current field errors if any field fails.
    pub fn submit(&mut self) -> Result<ContactInfo, FieldErrors> {
        self.touched.extend(Field::ALL);
        self.revalidate();
        validate(&self.form)
    }

    fn revalidate(&mut self) {
        self.errors = validate(&self.form).err().unwrap_or_default();
    }
}
