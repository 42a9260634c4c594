//! Field layout of a specification list
//!
//! The detail page lists spec values as alternating label/value items. The
//! number of items tells the powertrain apart: combustion trims carry a
//! horsepower entry, electric trims do not.

use crate::domain::{CarVariant, UNKNOWN_HORSEPOWER};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecLayout {
    /// Body type, engine cc, horsepower and fuel type at positions 0, 2, 4, 6
    Combustion,
    /// Body type, engine cc and fuel type at positions 0, 2, 4
    Electric,
    /// Any other item count; no variant can be built
    Unknown { field_count: usize },
}

impl SpecLayout {
    pub const COMBUSTION_FIELDS: usize = 7;
    pub const ELECTRIC_FIELDS: usize = 5;

    pub const fn resolve(field_count: usize) -> Self {
        match field_count {
            Self::COMBUSTION_FIELDS => Self::Combustion,
            Self::ELECTRIC_FIELDS => Self::Electric,
            field_count => Self::Unknown { field_count },
        }
    }

    /// Build a variant from the block's spec items, `None` for an unknown layout
    /// or when `items` does not match the layout's length.
    pub fn build_variant(&self, trim_name: &str, price: &str, items: &[String]) -> Option<CarVariant> {
        let (body_type, engine_cc, horsepower, fuel_type) = match (self, items) {
            (Self::Combustion, [body, _, engine, _, horsepower, _, fuel]) => {
                (body, engine, horsepower.clone(), fuel)
            }
            (Self::Electric, [body, _, engine, _, fuel]) => {
                (body, engine, UNKNOWN_HORSEPOWER.to_string(), fuel)
            }
            _ => return None,
        };

        Some(CarVariant {
            trim_name: trim_name.to_string(),
            price: price.to_string(),
            body_type: body_type.clone(),
            engine_cc: engine_cc.clone(),
            horsepower,
            fuel_type: fuel_type.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn items(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[rstest]
    #[case(7, SpecLayout::Combustion)]
    #[case(5, SpecLayout::Electric)]
    #[case(0, SpecLayout::Unknown { field_count: 0 })]
    #[case(6, SpecLayout::Unknown { field_count: 6 })]
    #[case(9, SpecLayout::Unknown { field_count: 9 })]
    fn layout_from_field_count(#[case] count: usize, #[case] expected: SpecLayout) {
        assert_eq!(SpecLayout::resolve(count), expected);
    }

    #[test]
    fn combustion_takes_even_positions_verbatim() {
        let fields = items(&["5門5人座掀背車", "x", "1498", "x", "150", "x", "汽油"]);
        let variant = SpecLayout::resolve(fields.len())
            .build_variant("35 TFSI", "149.9萬", &fields)
            .unwrap();

        assert_eq!(variant.body_type, "5門5人座掀背車");
        assert_eq!(variant.engine_cc, "1498");
        assert_eq!(variant.horsepower, "150");
        assert_eq!(variant.fuel_type, "汽油");
        assert_eq!(variant.trim_name, "35 TFSI");
        assert_eq!(variant.price, "149.9萬");
    }

    #[test]
    fn electric_gets_horsepower_placeholder() {
        let fields = items(&["4門5人座房車", "x", "0", "x", "電能"]);
        let variant = SpecLayout::resolve(fields.len())
            .build_variant("Long Range", "199.9萬", &fields)
            .unwrap();

        assert_eq!(variant.body_type, "4門5人座房車");
        assert_eq!(variant.engine_cc, "0");
        assert_eq!(variant.horsepower, UNKNOWN_HORSEPOWER);
        assert_eq!(variant.fuel_type, "電能");
    }

    #[test]
    fn mismatched_items_build_nothing() {
        let fields = items(&["a", "b", "c", "d", "e"]);
        assert!(SpecLayout::Combustion.build_variant("t", "p", &fields).is_none());
    }

    proptest! {
        #[test]
        fn other_field_counts_yield_no_variant(count in 0_usize..40) {
            prop_assume!(count != 5 && count != 7);
            let fields = vec!["v".to_string(); count];
            let layout = SpecLayout::resolve(count);
            prop_assert_eq!(layout, SpecLayout::Unknown { field_count: count });
            prop_assert!(layout.build_variant("t", "p", &fields).is_none());
        }
    }
}
