use crate::core::models::interaction::Interaction;
use std::io::Write;
use std::path::Path;

/// Writes interactions as CSV with a header row matching the interaction field names.
pub fn write_interactions<W: Write>(
    interactions: &[Interaction],
    writer: W,
) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for interaction in interactions {
        csv_writer.serialize(interaction)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_interactions_to_path(
    interactions: &[Interaction],
    path: &Path,
) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_interactions(interactions, std::io::BufWriter::new(file))
}
