//! Testing utilities for driving combat deterministically.
//!
//! Production code rolls through [`crate::dice::RandomDice`]; the
//! sources here replace entropy with known faces so a test controls
//! every round exactly. They are exported un-gated for use by
//! downstream crates' tests.

use crate::dice::DiceSource;
use std::collections::VecDeque;

/// A dice source that pops pre-programmed faces in order.
///
/// Exhausting the script, or scripting a face out of range for the
/// die being rolled, panics: both are bugs in the test.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: VecDeque<u32>,
}

impl ScriptedDice {
    /// Create a script from faces in roll order.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    /// Number of scripted faces not yet consumed.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }

    /// Append more faces to the script.
    pub fn queue(&mut self, faces: impl IntoIterator<Item = u32>) {
        self.faces.extend(faces);
    }
}

impl DiceSource for ScriptedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let face = self
            .faces
            .pop_front()
            .unwrap_or_else(|| panic!("ScriptedDice ran out of faces for a d{sides} roll"));
        assert!(
            (1..=sides).contains(&face),
            "scripted face {face} is out of range for a d{sides}"
        );
        face
    }
}

/// A dice source that always lands on the same face (clamped to the
/// die being rolled).
#[derive(Debug, Clone, Copy)]
pub struct FixedDice(pub u32);

impl DiceSource for FixedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.0.clamp(1, sides)
    }
}
