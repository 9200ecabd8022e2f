pub mod company_cards;
pub mod pokedex_table;

pub use company_cards::{CompanyCardExtractor, COMPANY_COLUMNS};
pub use pokedex_table::{PokedexTableExtractor, TableStructureDetector, POKEDEX_COLUMNS};
