//! Tabla periódica mínima: símbolo ↔ número atómico y las familias que usan
//! los filtros de composición.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Símbolos ordenados por número atómico (índice + 1).
pub const SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar", "K", "Ca", "Sc",
    "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As", "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr",
    "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr",
    "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt",
    "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk",
    "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv",
    "Ts", "Og",
];

static BY_SYMBOL: Lazy<HashMap<&'static str, u8>> =
    Lazy::new(|| SYMBOLS.iter().enumerate().map(|(i, s)| (*s, (i + 1) as u8)).collect());

pub const HALOGENS: [&str; 5] = ["F", "Cl", "Br", "I", "At"];

const ALKALI: [u8; 6] = [3, 11, 19, 37, 55, 87];
const ALKALINE_EARTH: [u8; 6] = [4, 12, 20, 38, 56, 88];
// Al, Ga, In, Tl, Sn, Pb, Bi
const POST_TRANSITION: [u8; 7] = [13, 31, 49, 81, 50, 82, 83];

pub fn atomic_number(symbol: &str) -> Option<u8> {
    BY_SYMBOL.get(symbol).copied()
}

pub fn is_element(symbol: &str) -> bool {
    BY_SYMBOL.contains_key(symbol)
}

pub fn is_lanthanoid(z: u8) -> bool {
    (57..=71).contains(&z)
}

pub fn is_actinoid(z: u8) -> bool {
    (89..=103).contains(&z)
}

pub fn is_f_block(z: u8) -> bool {
    is_lanthanoid(z) || is_actinoid(z)
}

/// Grupos 3–12, incluyendo La y Ac.
pub fn is_transition_metal(z: u8) -> bool {
    matches!(z, 21..=30 | 39..=48 | 57 | 72..=80 | 89 | 104..=112)
}

pub fn is_alkali(z: u8) -> bool {
    ALKALI.contains(&z)
}

pub fn is_alkaline_earth(z: u8) -> bool {
    ALKALINE_EARTH.contains(&z)
}

pub fn is_post_transition_metal(z: u8) -> bool {
    POST_TRANSITION.contains(&z)
}

pub fn is_metal(z: u8) -> bool {
    is_alkali(z) || is_alkaline_earth(z) || is_post_transition_metal(z) || is_transition_metal(z) || is_f_block(z)
}

pub fn is_halogen(symbol: &str) -> bool {
    HALOGENS.contains(&symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_map_to_atomic_numbers() {
        assert_eq!(atomic_number("H"), Some(1));
        assert_eq!(atomic_number("Fe"), Some(26));
        assert_eq!(atomic_number("Og"), Some(118));
        assert_eq!(atomic_number("Xx"), None);
    }

    #[test]
    fn families() {
        let z = |s| atomic_number(s).unwrap();
        assert!(is_transition_metal(z("La")) && is_lanthanoid(z("La")));
        assert!(is_actinoid(z("U")) && is_metal(z("U")));
        assert!(is_metal(z("Bi")) && is_metal(z("Na")) && is_metal(z("Ba")));
        assert!(!is_metal(z("Si")) && !is_metal(z("O")) && !is_metal(z("Ge")));
        assert!(!is_transition_metal(z("Ce")));
    }
}
