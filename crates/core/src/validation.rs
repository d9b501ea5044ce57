//! Form validation for the add-item and login screens.
//!
//! Both forms hold raw text exactly as typed. Validation trims it, reports
//! every problem at once (add-item) or the first blocking one (login), and
//! only hands back typed values when the whole form is acceptable.

use core::fmt;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use secrecy::SecretString;

use crate::category::infer_category;
use crate::product::NewProduct;
use crate::types::{Email, Price, PriceError, Quantity, QuantityError, UserId};

// =============================================================================
// Add-item form
// =============================================================================

/// Add-item form fields that can fail validation.
///
/// Store address and tags are free-form and never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FormField {
    Name,
    StoreName,
    Description,
    Quantity,
    Price,
}

impl FormField {
    /// Every validated field, in form order.
    pub const ALL: [Self; 5] = [
        Self::Name,
        Self::StoreName,
        Self::Description,
        Self::Quantity,
        Self::Price,
    ];

    /// Human-readable field label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Product name",
            Self::StoreName => "Store name",
            Self::Description => "Product description",
            Self::Quantity => "Quantity",
            Self::Price => "Price",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why a single field was rejected.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Blank after trimming.
    #[error("is required")]
    Required,
    /// Parsed, but below zero.
    #[error("cannot be negative")]
    Negative,
    /// Quantity text is not a whole number.
    #[error("must be a whole number")]
    NotAWholeNumber,
    /// Price text is not a number.
    #[error("must be a number")]
    NotANumber,
    /// Price is a number, but too large to hold.
    #[error("is too large")]
    TooLarge,
}

impl FieldError {
    /// Inline message shown next to `field`, e.g. "Store name is required".
    #[must_use]
    pub fn message(self, field: FormField) -> String {
        format!("{} {self}", field.label())
    }
}

impl From<QuantityError> for FieldError {
    fn from(err: QuantityError) -> Self {
        match err {
            QuantityError::NotAWholeNumber => Self::NotAWholeNumber,
            QuantityError::Negative => Self::Negative,
        }
    }
}

impl From<PriceError> for FieldError {
    fn from(err: PriceError) -> Self {
        match err {
            PriceError::NotANumber => Self::NotANumber,
            PriceError::Negative => Self::Negative,
            PriceError::TooLarge => Self::TooLarge,
        }
    }
}

/// Per-field errors from validating a [`ProductForm`].
///
/// Empty means the form passed. At most one error is kept per field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(BTreeMap<FormField, FieldError>);

impl ValidationErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The error recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: FormField) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    /// Errors in form order.
    pub fn iter(&self) -> impl Iterator<Item = (FormField, FieldError)> + '_ {
        self.0.iter().map(|(field, err)| (*field, *err))
    }

    /// Inline messages in form order.
    pub fn messages(&self) -> impl Iterator<Item = (FormField, String)> + '_ {
        self.iter().map(|(field, err)| (field, err.message(field)))
    }

    fn insert(&mut self, field: FormField, err: FieldError) {
        self.0.insert(field, err);
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.messages().map(|(_, m)| m).collect();
        f.write_str(&messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Raw add-item form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductForm {
    pub name: String,
    pub store_name: String,
    pub store_address: String,
    pub description: String,
    pub quantity: String,
    pub tags: String,
    pub price: String,
}

impl ProductForm {
    /// Check every field and collect all problems.
    #[must_use]
    pub fn validate(&self) -> ValidationErrors {
        self.check().err().unwrap_or_default()
    }

    /// Build the listing this form describes.
    ///
    /// Text fields are trimmed, tags lowercased and the category inferred
    /// from them.
    ///
    /// # Errors
    ///
    /// Returns the full set of field errors if any field is invalid.
    pub fn to_new_product(
        &self,
        owner: &UserId,
        added_at: DateTime<Utc>,
    ) -> Result<NewProduct, ValidationErrors> {
        let (quantity, price) = self.check()?;
        let tags = self.tags.trim();

        Ok(NewProduct {
            name: self.name.trim().to_owned(),
            description: self.description.trim().to_owned(),
            category: infer_category(tags),
            store_name: self.store_name.trim().to_owned(),
            store_address: self.store_address.trim().to_owned(),
            tags: tags.to_lowercase(),
            price,
            quantity,
            business_user_id: owner.clone(),
            date_added: added_at,
        })
    }

    /// Reset every field to blank.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn check(&self) -> Result<(Quantity, Price), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        for (field, raw) in [
            (FormField::Name, &self.name),
            (FormField::StoreName, &self.store_name),
            (FormField::Description, &self.description),
        ] {
            if raw.trim().is_empty() {
                errors.insert(field, FieldError::Required);
            }
        }

        let quantity = required(&self.quantity).and_then(|s| Ok(Quantity::parse(s)?));
        let quantity = match quantity {
            Ok(quantity) => Some(quantity),
            Err(err) => {
                errors.insert(FormField::Quantity, err);
                None
            }
        };

        let price = required(&self.price).and_then(|s| Ok(Price::parse(s)?));
        let price = match price {
            Ok(price) => Some(price),
            Err(err) => {
                errors.insert(FormField::Price, err);
                None
            }
        };

        match (quantity, price) {
            (Some(quantity), Some(price)) if errors.is_empty() => Ok((quantity, price)),
            _ => Err(errors),
        }
    }
}

fn required(raw: &str) -> Result<&str, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(FieldError::Required)
    } else {
        Ok(trimmed)
    }
}

// =============================================================================
// Login form
// =============================================================================

/// Login form problems caught before contacting the identity provider.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("Please enter both login and password")]
    MissingFields,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}

/// Raw login form input.
#[derive(Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Login input that passed local checks.
#[derive(Debug)]
pub struct Credentials {
    pub email: Email,
    pub password: SecretString,
}

impl LoginForm {
    /// Minimum accepted password length, in characters.
    pub const MIN_PASSWORD_LENGTH: usize = 6;

    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Trim and check the form.
    ///
    /// # Errors
    ///
    /// Returns the first [`LoginError`] found: missing fields, then email
    /// shape, then password length.
    pub fn validate(&self) -> Result<Credentials, LoginError> {
        let email = self.email.trim();
        let password = self.password.trim();

        if email.is_empty() || password.is_empty() {
            return Err(LoginError::MissingFields);
        }

        let email = Email::parse(email).map_err(|_| LoginError::InvalidEmail)?;

        if password.chars().count() < Self::MIN_PASSWORD_LENGTH {
            return Err(LoginError::PasswordTooShort {
                min: Self::MIN_PASSWORD_LENGTH,
            });
        }

        Ok(Credentials {
            email,
            password: SecretString::from(password.to_owned()),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;
    use secrecy::ExposeSecret;

    use super::*;
    use crate::category::Category;

    fn filled_form() -> ProductForm {
        ProductForm {
            name: "  Organic Coffee ".to_string(),
            store_name: "Bean There Cafe".to_string(),
            store_address: String::new(),
            description: "Fresh roasted organic coffee beans".to_string(),
            quantity: "20".to_string(),
            tags: "Food, Coffee, ORGANIC".to_string(),
            price: "12.99".to_string(),
        }
    }

    #[test]
    fn test_empty_form_flags_five_fields() {
        let errors = ProductForm::default().validate();
        assert_eq!(errors.len(), 5);
        for field in FormField::ALL {
            assert_eq!(errors.get(field), Some(FieldError::Required), "{field}");
        }
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        let form = ProductForm {
            name: "   ".to_string(),
            ..filled_form()
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(FormField::Name), Some(FieldError::Required));
    }

    #[test]
    fn test_filled_form_passes_regardless_of_address() {
        assert!(filled_form().validate().is_empty());

        let with_address = ProductForm {
            store_address: "456 Coffee Lane, Manchester".to_string(),
            ..filled_form()
        };
        assert!(with_address.validate().is_empty());
    }

    #[test]
    fn test_negative_numbers_rejected() {
        let form = ProductForm {
            quantity: "-1".to_string(),
            price: "-0.01".to_string(),
            ..filled_form()
        };
        let errors = form.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get(FormField::Quantity), Some(FieldError::Negative));
        assert_eq!(errors.get(FormField::Price), Some(FieldError::Negative));
    }

    #[test]
    fn test_unparsable_numbers_distinct_from_required() {
        let form = ProductForm {
            quantity: "a few".to_string(),
            price: "cheap".to_string(),
            ..filled_form()
        };
        let errors = form.validate();
        assert_eq!(
            errors.get(FormField::Quantity),
            Some(FieldError::NotAWholeNumber)
        );
        assert_eq!(errors.get(FormField::Price), Some(FieldError::NotANumber));
    }

    #[test]
    fn test_price_follows_float_syntax() {
        let form = ProductForm {
            price: "1_000".to_string(),
            ..filled_form()
        };
        assert_eq!(
            form.validate().get(FormField::Price),
            Some(FieldError::NotANumber)
        );

        let form = ProductForm {
            price: "99999999999999999999999999999".to_string(),
            ..filled_form()
        };
        let errors = form.validate();
        assert_eq!(errors.get(FormField::Price), Some(FieldError::TooLarge));
        assert_eq!(
            FieldError::TooLarge.message(FormField::Price),
            "Price is too large"
        );
    }

    #[test]
    fn test_messages() {
        let form = ProductForm {
            quantity: "-1".to_string(),
            ..ProductForm::default()
        };
        let messages: Vec<String> = form.validate().messages().map(|(_, m)| m).collect();
        assert_eq!(
            messages,
            vec![
                "Product name is required",
                "Store name is required",
                "Product description is required",
                "Quantity cannot be negative",
                "Price is required",
            ]
        );
    }

    #[test]
    fn test_to_new_product_normalises_input() {
        let owner = UserId::new("uid-1");
        let added_at = Utc.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap();

        let product = filled_form().to_new_product(&owner, added_at).unwrap();

        assert_eq!(product.name, "Organic Coffee");
        assert_eq!(product.tags, "food, coffee, organic");
        assert_eq!(product.category, Category::FoodAndDrink);
        assert_eq!(product.store_address, "");
        assert_eq!(product.quantity.get(), 20);
        assert_eq!(product.price.to_string(), "12.99");
        assert_eq!(product.business_user_id, owner);
        assert_eq!(product.date_added, added_at);
    }

    #[test]
    fn test_to_new_product_returns_all_errors() {
        let errors = ProductForm::default()
            .to_new_product(&UserId::new("uid-1"), Utc::now())
            .unwrap_err();
        assert_eq!(errors.len(), 5);
    }

    #[test]
    fn test_clear() {
        let mut form = filled_form();
        form.clear();
        assert_eq!(form, ProductForm::default());
    }

    #[test]
    fn test_login_valid() {
        let creds = LoginForm::new(" trader@stall.co.uk ", " hunter22 ")
            .validate()
            .unwrap();
        assert_eq!(creds.email.as_str(), "trader@stall.co.uk");
        assert_eq!(creds.password.expose_secret(), "hunter22");
    }

    #[test]
    fn test_login_missing_fields() {
        assert_eq!(
            LoginForm::new("", "secret1").validate().unwrap_err(),
            LoginError::MissingFields
        );
        assert_eq!(
            LoginForm::new("a@b.com", "   ").validate().unwrap_err(),
            LoginError::MissingFields
        );
    }

    #[test]
    fn test_login_invalid_email() {
        assert_eq!(
            LoginForm::new("not-an-email", "secret1")
                .validate()
                .unwrap_err(),
            LoginError::InvalidEmail
        );
    }

    #[test]
    fn test_login_short_password() {
        let err = LoginForm::new("a@b.com", "12345").validate().unwrap_err();
        assert_eq!(err, LoginError::PasswordTooShort { min: 6 });
        assert_eq!(err.to_string(), "Password must be at least 6 characters");
    }

    #[test]
    fn test_login_form_debug_redacts_password() {
        let form = LoginForm::new("a@b.com", "super-secret-password");
        let debug = format!("{form:?}");
        assert!(debug.contains("a@b.com"));
        assert!(!debug.contains("super-secret-password"));
    }
}
