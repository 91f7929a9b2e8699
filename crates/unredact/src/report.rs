use colored::Colorize;
use unredact_core::DocumentReconstruction;

use crate::prelude::{println, *};

/// One row per page: boxes found, lines rebuilt, words, and words under a box.
pub fn pages_table(reconstruction: &DocumentReconstruction) -> prettytable::Table {
    let mut table = new_table();
    table.add_row(prettytable::row![
        "Page".bold().cyan(),
        "Boxes".bold().cyan(),
        "Lines".bold().cyan(),
        "Words".bold().cyan(),
        "Covered".bold().cyan()
    ]);

    for page in &reconstruction.pages {
        let covered = page.stats.covered_words.to_string();
        table.add_row(prettytable::row![
            page.page_number.to_string().green(),
            page.boxes.len().to_string().bright_white(),
            page.lines.len().to_string().bright_white(),
            page.stats.words.to_string().bright_white(),
            if page.stats.covered_words > 0 {
                covered.bright_yellow()
            } else {
                covered.bright_black()
            }
        ]);
    }

    table
}

pub fn print_pages(reconstruction: &DocumentReconstruction) {
    if reconstruction.pages.is_empty() {
        println!("No pages found.");
        return;
    }
    pages_table(reconstruction).printstd();
}
