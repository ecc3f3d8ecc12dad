pub mod composition;
pub mod structures;

pub use composition::{composition_filters, composition_of, ELEMENT_COUNT_FIELD, FORMULA_FIELD};
pub use structures::{get_structures_step, put_structures_step, GET_STRUCTURES_STEP, MATERIAL_ID_FIELD,
                     PUT_STRUCTURES_STEP, STRUCTURE_FIELD};
