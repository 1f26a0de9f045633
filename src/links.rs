//! Link validation.
//!
//! A dragged link only snaps onto a pin when the configured [`LinkValidator`]
//! accepts the pin pair. The default validator combines
//! [`BasicLinkValidator`] and [`NoDuplicatesValidator`]; hosts can install
//! their own with [`EditorContext::set_link_validator`](crate::EditorContext::set_link_validator).
//!
//! The same basic rules decide whether a submitted link is well formed
//! enough to be drawn and hit tested.

use crate::records::PinRecord;
use std::fmt;

/// Pin pair of a link submitted this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkEnds {
    pub start_pin_id: i32,
    pub end_pin_id: i32,
}

impl LinkEnds {
    pub fn new(start_pin_id: i32, end_pin_id: i32) -> Self {
        Self {
            start_pin_id,
            end_pin_id,
        }
    }

    /// Pin order does not matter: `a -> b` and `b -> a` connect the same pins.
    pub fn connects(&self, a: i32, b: i32) -> bool {
        (self.start_pin_id == a && self.end_pin_id == b)
            || (self.start_pin_id == b && self.end_pin_id == a)
    }
}

/// Result of link validation with optional rejection reason
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Combine two results (AND logic): returns first error if any
    pub fn and(self, other: ValidationResult) -> ValidationResult {
        match self {
            ValidationResult::Valid => other,
            invalid => invalid,
        }
    }
}

/// Reasons why a link validation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Pin was not submitted this frame
    PinNotFound(i32),
    SamePin,
    SameNode,
    /// Both pins are inputs or both are outputs
    IncompatibleDirection,
    /// A link between these pins already exists, in either direction
    DuplicateLink,
    Custom(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PinNotFound(id) => write!(f, "Pin {} not found", id),
            Self::SamePin => write!(f, "Cannot link pin to itself"),
            Self::SameNode => write!(f, "Cannot link pins on same node"),
            Self::IncompatibleDirection => write!(f, "Must connect input to output"),
            Self::DuplicateLink => write!(f, "Link already exists"),
            Self::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

/// Decides whether a link between two pins may be created.
///
/// `links` holds every link submitted this frame.
pub trait LinkValidator {
    fn validate(&self, start: &PinRecord, end: &PinRecord, links: &[LinkEnds]) -> ValidationResult;
}

/// Pins must differ, sit on different nodes and face opposite directions.
#[derive(Clone, Copy, Debug, Default)]
pub struct BasicLinkValidator;

impl LinkValidator for BasicLinkValidator {
    fn validate(
        &self,
        start: &PinRecord,
        end: &PinRecord,
        _links: &[LinkEnds],
    ) -> ValidationResult {
        if start.id == end.id {
            return ValidationResult::Invalid(ValidationError::SamePin);
        }
        if start.parent_node == end.parent_node {
            return ValidationResult::Invalid(ValidationError::SameNode);
        }
        if start.kind == end.kind {
            return ValidationResult::Invalid(ValidationError::IncompatibleDirection);
        }
        ValidationResult::Valid
    }
}

/// Rejects a pin pair that is already connected.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoDuplicatesValidator;

impl LinkValidator for NoDuplicatesValidator {
    fn validate(&self, start: &PinRecord, end: &PinRecord, links: &[LinkEnds]) -> ValidationResult {
        if links.iter().any(|l| l.connects(start.id, end.id)) {
            ValidationResult::Invalid(ValidationError::DuplicateLink)
        } else {
            ValidationResult::Valid
        }
    }
}

/// Composite validator that combines multiple validators
///
/// All validators must return Valid for the link to be valid (AND logic).
/// Returns the first error encountered.
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn LinkValidator>>,
}

impl CompositeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validators are checked in the order they were added.
    pub fn add<V: LinkValidator + 'static>(mut self, validator: V) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    /// The validator the editor uses unless the host installs another one.
    pub fn editor_default() -> Self {
        Self::new().add(BasicLinkValidator).add(NoDuplicatesValidator)
    }
}

impl LinkValidator for CompositeValidator {
    fn validate(&self, start: &PinRecord, end: &PinRecord, links: &[LinkEnds]) -> ValidationResult {
        for v in &self.validators {
            let result = v.validate(start, end, links);
            if !result.is_valid() {
                return result;
            }
        }
        ValidationResult::Valid
    }
}

impl fmt::Debug for CompositeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeValidator")
            .field("validators", &self.validators.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::PoolItem;
    use crate::records::PinKind;

    fn pin(id: i32, node: usize, kind: PinKind) -> PinRecord {
        let mut pin = PinRecord::from_id(id);
        pin.parent_node = node;
        pin.kind = kind;
        pin
    }

    // ========================================================================
    // BasicLinkValidator
    // ========================================================================

    #[test]
    fn test_basic_accepts_output_to_input() {
        let out = pin(1, 0, PinKind::Output);
        let inp = pin(2, 1, PinKind::Input);
        assert!(BasicLinkValidator.validate(&out, &inp, &[]).is_valid());
        assert!(BasicLinkValidator.validate(&inp, &out, &[]).is_valid());
    }

    #[test]
    fn test_basic_rejects_same_node() {
        let a = pin(1, 0, PinKind::Output);
        let b = pin(2, 0, PinKind::Input);
        assert_eq!(
            BasicLinkValidator.validate(&a, &b, &[]),
            ValidationResult::Invalid(ValidationError::SameNode)
        );
    }

    #[test]
    fn test_basic_rejects_same_direction() {
        let a = pin(1, 0, PinKind::Output);
        let b = pin(2, 1, PinKind::Output);
        assert_eq!(
            BasicLinkValidator.validate(&a, &b, &[]),
            ValidationResult::Invalid(ValidationError::IncompatibleDirection)
        );
    }

    #[test]
    fn test_basic_rejects_same_pin() {
        let a = pin(1, 0, PinKind::Output);
        assert_eq!(
            BasicLinkValidator.validate(&a, &a, &[]),
            ValidationResult::Invalid(ValidationError::SamePin)
        );
    }

    // ========================================================================
    // NoDuplicatesValidator
    // ========================================================================

    #[test]
    fn test_duplicate_detected_in_either_direction() {
        let out = pin(1, 0, PinKind::Output);
        let inp = pin(2, 1, PinKind::Input);
        let links = [LinkEnds::new(2, 1)];

        assert_eq!(
            NoDuplicatesValidator.validate(&out, &inp, &links),
            ValidationResult::Invalid(ValidationError::DuplicateLink)
        );
    }

    #[test]
    fn test_unrelated_links_are_not_duplicates() {
        let out = pin(1, 0, PinKind::Output);
        let inp = pin(2, 1, PinKind::Input);
        let links = [LinkEnds::new(1, 3), LinkEnds::new(4, 2)];
        assert!(NoDuplicatesValidator.validate(&out, &inp, &links).is_valid());
    }

    // ========================================================================
    // CompositeValidator
    // ========================================================================

    struct RejectAll;

    impl LinkValidator for RejectAll {
        fn validate(&self, _: &PinRecord, _: &PinRecord, _: &[LinkEnds]) -> ValidationResult {
            ValidationResult::Invalid(ValidationError::Custom("nope".into()))
        }
    }

    #[test]
    fn test_composite_returns_first_error() {
        let out = pin(1, 0, PinKind::Output);
        let other = pin(2, 1, PinKind::Output);
        let validator = CompositeValidator::new().add(BasicLinkValidator).add(RejectAll);

        assert_eq!(
            validator.validate(&out, &other, &[]),
            ValidationResult::Invalid(ValidationError::IncompatibleDirection)
        );
    }

    #[test]
    fn test_composite_runs_custom_rules() {
        let out = pin(1, 0, PinKind::Output);
        let inp = pin(2, 1, PinKind::Input);
        let validator = CompositeValidator::editor_default().add(RejectAll);

        let result = validator.validate(&out, &inp, &[]);
        assert!(!result.is_valid());
        if let ValidationResult::Invalid(err) = result {
            assert_eq!(err.to_string(), "nope");
        }
    }

    #[test]
    fn test_validation_result_and() {
        let invalid = ValidationResult::Invalid(ValidationError::SamePin);
        assert_eq!(ValidationResult::Valid.and(invalid.clone()), invalid);
        assert_eq!(invalid.clone().and(ValidationResult::Valid), invalid);
    }
}
