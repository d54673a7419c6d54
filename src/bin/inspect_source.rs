use pgs_dossier::normalize::{classify_header, ColumnKind};
use pgs_dossier::source::load_raw;
use std::{env, path::Path, process::exit};

fn main() {
    // Expect a source path and an optional sheet name.
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <SOURCE_FILE> [SHEET]", args[0]);
        exit(1);
    }
    if let Err(e) = inspect_source(Path::new(&args[1]), args.get(2).map(String::as_str)) {
        eprintln!("Error: {:#}", e);
        exit(1);
    }
}

/// Print how every header of the source would be classified.
fn inspect_source(path: &Path, sheet: Option<&str>) -> anyhow::Result<()> {
    let Some(raw) = load_raw(path, sheet)? else {
        println!("{} does not exist (no data)", path.display());
        return Ok(());
    };

    println!("=== Source: {} ===", path.display());
    println!("Rows:    {}", raw.rows.len());
    println!("Headers: {}", raw.headers.len());
    println!();

    println!("=== Columns ===");
    for (i, header) in raw.headers.iter().enumerate() {
        let kind = match classify_header(header) {
            ColumnKind::Fixed(field) => format!("field {:?}", field),
            ColumnKind::FundDate(date) => format!("fund {}", date),
            ColumnKind::BadFundDate { token } => format!("SKIPPED (bad date {:?})", token),
            ColumnKind::Ignored => "ignored".to_string(),
        };
        println!("- {:>3} {:<45} | {}", i, format!("{:?}", header), kind);
    }
    Ok(())
}
