use crate::domain::model::{Extraction, Record, Schema, TableStructure};
use crate::domain::ports::RecordExtractor;
use crate::utils::error::Result;
use crate::utils::html::{normalize_text, selector, MissingNode, Node};
use scraper::{ElementRef, Html, Selector};

pub const POKEDEX_COLUMNS: [&str; 10] = [
    "No", "Name", "Type", "Abilities", "HP", "Att", "Def", "S.Att", "S.Def", "Spd",
];

/// Rows 0 and 1 of the table are the title and the column header.
const HEADER_ROWS: usize = 2;
const HEADER_ROW_INDEX: usize = 1;

/// Reads the header row of a stat table to decide its layout.
pub struct TableStructureDetector {
    table: Selector,
    row: Selector,
    header_cell: Selector,
}

impl TableStructureDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            table: selector("table.dextable")?,
            row: selector("tr")?,
            header_cell: selector("td, th")?,
        })
    }

    pub fn detect(&self, document: &Html) -> Option<TableStructure> {
        let table = document.select(&self.table).next()?;
        let header = table.select(&self.row).nth(HEADER_ROW_INDEX)?;

        let labels: Vec<String> = header
            .select(&self.header_cell)
            .map(|cell| normalize_text(&cell.text().collect::<String>()).unwrap_or_default())
            .collect();

        Some(TableStructure {
            min_columns: labels.len(),
            has_abilities: labels.iter().any(|l| l == "Abilities"),
            special_stat: labels.iter().any(|l| l == "Special"),
        })
    }

    fn data_rows<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document
            .select(&self.table)
            .next()
            .map(|table| table.select(&self.row).skip(HEADER_ROWS).collect())
            .unwrap_or_default()
    }
}

enum RowParse {
    Parsed(Record),
    TooShort(usize),
    Invalid(MissingNode),
}

/// Pokédex type listings: one record per data row of `table.dextable`.
pub struct PokedexTableExtractor {
    schema: Schema,
    detector: TableStructureDetector,
    data_cell: Selector,
    link: Selector,
    image: Selector,
}

impl PokedexTableExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            schema: Schema::new(POKEDEX_COLUMNS),
            detector: TableStructureDetector::new()?,
            data_cell: selector("td.fooinfo")?,
            link: selector("a")?,
            image: selector("img")?,
        })
    }

    fn parse_row(&self, row: ElementRef<'_>, structure: &TableStructure) -> RowParse {
        let cols: Vec<ElementRef<'_>> = row.select(&self.data_cell).collect();
        if cols.len() < structure.min_columns {
            return RowParse::TooShort(cols.len());
        }

        let cell = |index: usize| cols.get(index).copied().map(Node::new).unwrap_or_else(Node::absent);
        let cell_text = |index: usize| cell(index).text();

        let name = match cell(2).find(&self.link).require("name link") {
            Ok(anchor) => Node::new(anchor).text(),
            Err(e) => return RowParse::Invalid(e),
        };

        let abilities = if structure.has_abilities {
            let names: Vec<String> = cell(4)
                .find_all(&self.link)
                .into_iter()
                .filter_map(|a| Node::new(a).text())
                .collect();
            join_non_empty(names)
        } else {
            None
        };

        let first_stat = if structure.has_abilities { 5 } else { 4 };
        let (hp, att, def, sp_att, sp_def, spd) = if structure.special_stat {
            (
                cell_text(first_stat),
                cell_text(first_stat + 1),
                cell_text(first_stat + 2),
                cell_text(first_stat + 3),
                None,
                cell_text(first_stat + 4),
            )
        } else {
            (
                cell_text(first_stat),
                cell_text(first_stat + 1),
                cell_text(first_stat + 2),
                cell_text(first_stat + 3),
                cell_text(first_stat + 4),
                cell_text(first_stat + 5),
            )
        };

        RowParse::Parsed(
            Record::new()
                .with("No", cell_text(0).map(|no| pad_dex_number(&no)))
                .with("Name", name)
                .with("Type", cols.get(3).and_then(|c| self.types(*c)))
                .with("Abilities", abilities)
                .with("HP", hp)
                .with("Att", att)
                .with("Def", def)
                .with("S.Att", sp_att)
                .with("S.Def", sp_def)
                .with("Spd", spd),
        )
    }

    /// Type names come from the icon file names, e.g. `/pokedex-bw/type/grass.gif`.
    fn types(&self, cell: ElementRef<'_>) -> Option<String> {
        let names: Vec<String> = cell
            .select(&self.image)
            .filter_map(|img| img.value().attr("src"))
            .filter_map(|src| src.rsplit('/').next())
            .filter_map(|file| file.split('.').next())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
            .collect();
        join_non_empty(names)
    }
}

fn join_non_empty(values: Vec<String>) -> Option<String> {
    if values.is_empty() {
        None
    } else {
        Some(values.join(", "))
    }
}

/// `#25` -> `0025`.
fn pad_dex_number(raw: &str) -> String {
    format!("{:0>4}", raw.trim_start_matches('#'))
}

impl RecordExtractor for PokedexTableExtractor {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn extract(&self, content: &str) -> Extraction {
        let document = Html::parse_document(content);
        let Some(structure) = self.detector.detect(&document) else {
            tracing::info!("No stat table found on page");
            return Extraction::empty();
        };
        tracing::debug!("Detected table structure: {:?}", structure);

        let mut extraction = Extraction::empty();
        for row in self.detector.data_rows(&document) {
            match self.parse_row(row, &structure) {
                RowParse::Parsed(record) => extraction.records.push(record),
                RowParse::TooShort(cells) => {
                    tracing::debug!(
                        "Skipping row with {} cells (need {})",
                        cells,
                        structure.min_columns
                    );
                }
                RowParse::Invalid(e) => {
                    tracing::warn!("Error parsing row: {}", e);
                    extraction.dropped += 1;
                }
            }
        }
        extraction
    }
}
