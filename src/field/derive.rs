//! Derived scalar fields computed from a base dense field.
//!
//! All computations honor the validity bitmap: an invalid entity produces 0
//! in the derived array and stays invalid, never an error.

use crate::field::FieldArray;
use crate::weld_error::WeldError;

/// Euclidean norm of the first two or three components, per entity.
///
/// # Errors
/// `InsufficientComponents` when the base field has fewer than 2 components.
/// Callers treat this as non-fatal: log and skip the derived field.
pub fn magnitude(base: &FieldArray) -> Result<FieldArray, WeldError> {
    if base.components() < 2 {
        return Err(WeldError::InsufficientComponents {
            needed: 2,
            found: base.components(),
        });
    }
    let take = base.components().min(3);
    let mut derived = FieldArray::zeroed(base.entity_count(), 1);
    for index in 0..base.entity_count() {
        if !base.is_valid(index) {
            continue;
        }
        let tuple = base.tuple(index)?;
        let norm = tuple[..take]
            .iter()
            .map(|&v| v * v)
            .sum::<f64>()
            .sqrt();
        derived.try_set_tuple(index, &[norm])?;
    }
    Ok(derived)
}

/// Von Mises invariant of a 6-component symmetric tensor, per entity.
///
/// Component order is `(s11, s22, s33, s12, s13, s23)`.
///
/// # Errors
/// `InsufficientComponents` when the base field has fewer than 6 components.
pub fn von_mises(base: &FieldArray) -> Result<FieldArray, WeldError> {
    if base.components() < 6 {
        return Err(WeldError::InsufficientComponents {
            needed: 6,
            found: base.components(),
        });
    }
    let mut derived = FieldArray::zeroed(base.entity_count(), 1);
    for index in 0..base.entity_count() {
        if !base.is_valid(index) {
            continue;
        }
        let t = base.tuple(index)?;
        let (s11, s22, s33, s12, s13, s23) = (t[0], t[1], t[2], t[3], t[4], t[5]);
        let vm = (0.5
            * ((s11 - s22).powi(2)
                + (s22 - s33).powi(2)
                + (s33 - s11).powi(2)
                + 6.0 * (s12.powi(2) + s13.powi(2) + s23.powi(2))))
        .sqrt();
        derived.try_set_tuple(index, &[vm])?;
    }
    Ok(derived)
}

/// Single-component slice of a multi-component field, per entity.
///
/// # Errors
/// `InsufficientComponents` when `index` is not a component of the base
/// field.
pub fn component(base: &FieldArray, index: usize) -> Result<FieldArray, WeldError> {
    if index >= base.components() {
        return Err(WeldError::InsufficientComponents {
            needed: index + 1,
            found: base.components(),
        });
    }
    let mut derived = FieldArray::zeroed(base.entity_count(), 1);
    for entity in 0..base.entity_count() {
        if !base.is_valid(entity) {
            continue;
        }
        let value = base.tuple(entity)?[index];
        derived.try_set_tuple(entity, &[value])?;
    }
    Ok(derived)
}
