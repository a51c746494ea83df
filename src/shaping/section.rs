//! Length sections with taper and cap scaling for the default ellipse.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::math::{Lerp, inverse_lerp};

/// Allowed gap between consecutive sections.
const CONTIGUITY_EPSILON: f32 = 1e-4;

/// A length range with bottom, cap and top radial scales.
///
/// The section blends across three zones: bottom scale to bottom-cap scale
/// up to `bottom_cap_pos`, bottom-cap to top-cap scale up to `top_cap_pos`,
/// then top-cap to top scale. Cap positions are relative to the section.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub from_length: f32,
    pub to_length: f32,
    pub bottom_scale: f32,
    pub bottom_cap_scale: f32,
    pub top_scale: f32,
    pub top_cap_scale: f32,
    pub bottom_cap_pos: f32,
    pub top_cap_pos: f32,
}

impl Section {
    /// Unit-scale section over `from..to`
    pub fn new(from_length: f32, to_length: f32) -> Result<Self> {
        if !(to_length > from_length) {
            return Err(Error::InvalidSection { from: from_length, to: to_length });
        }
        Ok(Self {
            from_length,
            to_length,
            bottom_scale: 1.0,
            bottom_cap_scale: 1.0,
            top_scale: 1.0,
            top_cap_scale: 1.0,
            bottom_cap_pos: 0.0,
            top_cap_pos: 1.0,
        })
    }

    pub fn with_scales(mut self, bottom: f32, bottom_cap: f32, top_cap: f32, top: f32) -> Self {
        self.bottom_scale = bottom;
        self.bottom_cap_scale = bottom_cap;
        self.top_cap_scale = top_cap;
        self.top_scale = top;
        self
    }

    /// Set cap positions, clamped into [0, 1] and ordered
    pub fn with_caps(mut self, bottom_cap_pos: f32, top_cap_pos: f32) -> Self {
        let a = bottom_cap_pos.clamp(0.0, 1.0);
        let b = top_cap_pos.clamp(0.0, 1.0);
        self.bottom_cap_pos = a.min(b);
        self.top_cap_pos = a.max(b);
        self
    }

    /// Radial scale at an absolute length inside (or clamped to) this section
    pub fn scale_at(&self, length: f32) -> f32 {
        let local = inverse_lerp(self.from_length, self.to_length, length);

        if local < self.bottom_cap_pos {
            let t = inverse_lerp(0.0, self.bottom_cap_pos, local);
            Lerp::lerp(&self.bottom_scale, &self.bottom_cap_scale, t)
        } else if local <= self.top_cap_pos {
            let t = inverse_lerp(self.bottom_cap_pos, self.top_cap_pos, local);
            Lerp::lerp(&self.bottom_cap_scale, &self.top_cap_scale, t)
        } else {
            let t = inverse_lerp(self.top_cap_pos, 1.0, local);
            Lerp::lerp(&self.top_cap_scale, &self.top_scale, t)
        }
    }
}

/// Ascending, contiguous sequence of [`Section`]s.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Section>", into = "Vec<Section>")]
pub struct SectionTable {
    sections: Vec<Section>,
}

impl SectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a section; it must start where the previous one ends.
    pub fn push(&mut self, section: Section) -> Result<()> {
        if !(section.to_length > section.from_length) {
            return Err(Error::InvalidSection { from: section.from_length, to: section.to_length });
        }
        if let Some(last) = self.sections.last() {
            if (section.from_length - last.to_length).abs() > CONTIGUITY_EPSILON {
                return Err(Error::InvalidSection { from: section.from_length, to: section.to_length });
            }
        }
        self.sections.push(section);
        Ok(())
    }

    pub fn with_section(mut self, section: Section) -> Result<Self> {
        self.push(section)?;
        Ok(self)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Radial scale at an absolute length.
    ///
    /// Uses the last section starting at or before `length`; 1.0 when no
    /// section applies.
    pub fn scale_at(&self, length: f32) -> f32 {
        let index = self.sections.partition_point(|s| s.from_length <= length);
        if index == 0 {
            return 1.0;
        }
        self.sections[index - 1].scale_at(length)
    }
}

impl TryFrom<Vec<Section>> for SectionTable {
    type Error = Error;

    fn try_from(sections: Vec<Section>) -> Result<Self> {
        let mut table = SectionTable::new();
        for section in sections {
            table.push(section)?;
        }
        Ok(table)
    }
}

impl From<SectionTable> for Vec<Section> {
    fn from(table: SectionTable) -> Self {
        table.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq_f32(a: f32, b: f32, eps: f32) -> bool {
        (a - b).abs() < eps
    }

    fn capped_section() -> Section {
        Section::new(0.0, 10.0)
            .unwrap()
            .with_scales(2.0, 1.0, 0.5, 0.0)
            .with_caps(0.2, 0.8)
    }

    #[test]
    fn test_section_rejects_empty_range() {
        assert!(Section::new(1.0, 1.0).is_err());
        assert!(Section::new(2.0, 1.0).is_err());
    }

    #[test]
    fn test_bottom_zone() {
        let section = capped_section();
        assert!(approx_eq_f32(section.scale_at(0.0), 2.0, 1e-5));
        assert!(approx_eq_f32(section.scale_at(1.0), 1.5, 1e-5));
    }

    #[test]
    fn test_middle_zone() {
        let section = capped_section();
        assert!(approx_eq_f32(section.scale_at(2.0), 1.0, 1e-5));
        assert!(approx_eq_f32(section.scale_at(5.0), 0.75, 1e-5));
        assert!(approx_eq_f32(section.scale_at(8.0), 0.5, 1e-5));
    }

    #[test]
    fn test_top_zone() {
        let section = capped_section();
        assert!(approx_eq_f32(section.scale_at(9.0), 0.25, 1e-5));
        assert!(approx_eq_f32(section.scale_at(10.0), 0.0, 1e-5));
    }

    #[test]
    fn test_caps_are_ordered() {
        let section = Section::new(0.0, 1.0).unwrap().with_caps(0.9, 0.1);
        assert_eq!(section.bottom_cap_pos, 0.1);
        assert_eq!(section.top_cap_pos, 0.9);
    }

    #[test]
    fn test_table_picks_last_started_section() {
        let table = SectionTable::new()
            .with_section(Section::new(0.0, 1.0).unwrap().with_scales(1.0, 1.0, 1.0, 1.0))
            .unwrap()
            .with_section(Section::new(1.0, 2.0).unwrap().with_scales(0.5, 0.5, 0.5, 0.5))
            .unwrap();

        assert!(approx_eq_f32(table.scale_at(0.5), 1.0, 1e-6));
        assert!(approx_eq_f32(table.scale_at(1.0), 0.5, 1e-6));
        assert!(approx_eq_f32(table.scale_at(1.5), 0.5, 1e-6));
        // Past the end stays clamped to the last section
        assert!(approx_eq_f32(table.scale_at(5.0), 0.5, 1e-6));
    }

    #[test]
    fn test_table_without_match_is_unit_scale() {
        assert_eq!(SectionTable::new().scale_at(3.0), 1.0);

        let table = SectionTable::new()
            .with_section(Section::new(1.0, 2.0).unwrap().with_scales(0.5, 0.5, 0.5, 0.5))
            .unwrap();
        assert_eq!(table.scale_at(0.5), 1.0);
    }

    #[test]
    fn test_table_rejects_gaps() {
        let mut table = SectionTable::new();
        table.push(Section::new(0.0, 1.0).unwrap()).unwrap();
        assert!(matches!(
            table.push(Section::new(1.5, 2.0).unwrap()),
            Err(Error::InvalidSection { .. })
        ));
    }

    #[test]
    fn test_table_json_validates() {
        let json = r#"[
            {"from_length":0.0,"to_length":1.0,"bottom_scale":1.0,"bottom_cap_scale":1.0,
             "top_scale":1.0,"top_cap_scale":1.0,"bottom_cap_pos":0.0,"top_cap_pos":1.0},
            {"from_length":3.0,"to_length":4.0,"bottom_scale":1.0,"bottom_cap_scale":1.0,
             "top_scale":1.0,"top_cap_scale":1.0,"bottom_cap_pos":0.0,"top_cap_pos":1.0}
        ]"#;
        assert!(serde_json::from_str::<SectionTable>(json).is_err());
    }
}
