//! Filtros por composición química.
//!
//! Cada filtro es un `PredicateFilter` sobre `"Reduced Formula"` o
//! `"NElements"`. Una fórmula que no se puede interpretar detiene el step
//! con `StepError::InvalidRecord`.

use matscreen_core::errors::StepError;
use matscreen_core::model::Record;
use matscreen_core::step::PredicateFilter;

use crate::elements::{atomic_number, is_actinoid, is_f_block, is_halogen, is_metal, is_transition_metal};
use crate::formula::Composition;

pub const FORMULA_FIELD: &str = "Reduced Formula";
pub const ELEMENT_COUNT_FIELD: &str = "NElements";

/// Cada cuántos registros reportan progreso los filtros lentos.
const SLOW_FILTER_PROGRESS: usize = 2000;

/// Relaciones M:X (metal de transición : C/N) de las fases MXene.
const MXENE_RATIOS: [(f64, f64); 4] = [(2.0, 1.0), (3.0, 2.0), (4.0, 3.0), (5.0, 4.0)];

pub fn composition_of(record: &Record) -> Result<Composition, StepError> {
    let formula = record.get_str(FORMULA_FIELD)?;
    Composition::parse(formula).map_err(|e| StepError::InvalidRecord(format!("formula '{formula}': {e}")))
}

/// Sin C y H a la vez.
pub fn is_inorganic(c: &Composition) -> bool {
    !(c.contains("C") && c.contains("H"))
}

pub fn contains_halogen(c: &Composition) -> bool {
    c.elements().any(is_halogen)
}

pub fn contains_metal(c: &Composition) -> bool {
    c.any_z(is_metal)
}

pub fn contains_f_block(c: &Composition) -> bool {
    c.any_z(is_f_block)
}

pub fn contains_actinide(c: &Composition) -> bool {
    c.any_z(is_actinoid)
}

pub fn contains_transition_metal(c: &Composition) -> bool {
    c.any_z(is_transition_metal)
}

/// Al menos un elemento no metálico.
pub fn is_not_intermetallic(c: &Composition) -> bool {
    !c.all_z(is_metal)
}

/// M:X en 2:1, 3:2, 4:3 o 5:4, con M el último metal de transición y X el
/// último de C/N de la fórmula. Sin ambos no hay relación que comprobar.
pub fn has_mxene_ratio(c: &Composition) -> bool {
    let m = c.elements()
             .filter(|s| atomic_number(s).is_some_and(is_transition_metal))
             .last();
    let x = c.elements().filter(|s| *s == "C" || *s == "N").last();
    let (Some(m), Some(x)) = (m, x) else {
        return false;
    };
    let (Some(nm), Some(nx)) = (c.amount(m), c.amount(x)) else {
        return false;
    };
    MXENE_RATIOS.iter().any(|(rm, rx)| nm == *rm && nx == *rx)
}

/// Mayor cantidad / menor cantidad <= `max_ratio`.
pub fn within_amount_ratio(c: &Composition, max_ratio: f64) -> bool {
    let (min, max) = c.amounts()
                      .fold((f64::INFINITY, 0.0_f64), |(lo, hi), (_, n)| (lo.min(n), hi.max(n)));
    max / min <= max_ratio
}

fn formula_filter<F>(name: &str, keep: F) -> PredicateFilter
    where F: Fn(&Composition) -> bool + Send + Sync + 'static
{
    PredicateFilter::new(name, move |record| Ok(keep(&composition_of(record)?)))
}

fn element_count_filter<F>(name: &str, keep: F) -> PredicateFilter
    where F: Fn(u64) -> bool + Send + Sync + 'static
{
    PredicateFilter::new(name, move |record| Ok(keep(record.get_u64(ELEMENT_COUNT_FIELD)?)))
}

/// Todos los filtros de composición, en el orden en que se registran.
pub fn composition_filters() -> Vec<PredicateFilter> {
    vec![formula_filter("Inorganic", is_inorganic),
         element_count_filter("BinaryComp", |n| n == 2),
         element_count_filter("Contains3orLessElem", |n| n <= 3),
         formula_filter("ContainsOxygen", |c| c.contains("O")),
         formula_filter("ContainsHalogen", contains_halogen),
         formula_filter("Cu_or_Ni", |c| c.contains_any(&["Cu", "Ni"])),
         formula_filter("ContainsMetal", contains_metal),
         formula_filter("ContainsFBlock", contains_f_block).with_progress(SLOW_FILTER_PROGRESS),
         formula_filter("AntiFBlock", |c| !contains_f_block(c)).with_progress(SLOW_FILTER_PROGRESS),
         formula_filter("AntiActinide", |c| !contains_actinide(c)).with_progress(SLOW_FILTER_PROGRESS),
         formula_filter("ContainsTM", contains_transition_metal),
         formula_filter("ContainsTMorF", |c| contains_transition_metal(c) || contains_f_block(c)),
         formula_filter("ContainsCorN", |c| c.contains_any(&["C", "N"])),
         formula_filter("RemoveIntermetallics", is_not_intermetallic),
         formula_filter("MXeneRatio", has_mxene_ratio),
         formula_filter("7to1Ratio", |c| within_amount_ratio(c, 7.0))]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(f: &str) -> Composition {
        Composition::parse(f).unwrap()
    }

    #[test]
    fn organic_needs_both_carbon_and_hydrogen() {
        assert!(!is_inorganic(&comp("CH4")));
        assert!(is_inorganic(&comp("CO2")));
        assert!(is_inorganic(&comp("LiH")));
    }

    #[test]
    fn intermetallics() {
        assert!(!is_not_intermetallic(&comp("Ni3Al")));
        assert!(is_not_intermetallic(&comp("NiO")));
    }

    #[test]
    fn mxene_ratios() {
        assert!(has_mxene_ratio(&comp("Ti2C")));
        assert!(has_mxene_ratio(&comp("Ti3C2")));
        assert!(has_mxene_ratio(&comp("Nb4C3")));
        assert!(has_mxene_ratio(&comp("V5N4")));
        assert!(!has_mxene_ratio(&comp("TiC")));
        assert!(!has_mxene_ratio(&comp("Al2O3")));
    }

    #[test]
    fn seven_to_one() {
        assert!(within_amount_ratio(&comp("Li7N"), 7.0));
        assert!(!within_amount_ratio(&comp("Li8N"), 7.0));
        assert!(within_amount_ratio(&comp("Fe"), 7.0));
    }

    #[test]
    fn tm_or_f_block_accepts_either() {
        assert!(contains_transition_metal(&comp("Fe2O3")) || contains_f_block(&comp("Fe2O3")));
        assert!(!contains_transition_metal(&comp("CeO2")) && contains_f_block(&comp("CeO2")));
        assert!(!contains_transition_metal(&comp("NaCl")) && !contains_f_block(&comp("NaCl")));
    }

    #[test]
    fn unparsable_formula_is_an_invalid_record() {
        let record = Record::from_iter([(FORMULA_FIELD, "Qq2")]);
        assert!(matches!(composition_of(&record), Err(StepError::InvalidRecord(_))));
        assert!(matches!(composition_of(&Record::new()), Err(StepError::MissingField(_))));
    }
}
