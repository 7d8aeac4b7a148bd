use std::{fs, path::Path};

use anyhow::{Context, Result};
use log::{debug, trace};

use crate::{dsse, pep740};

/// Converts a DSSE attestation file to a PEP 740 attestation file.
///
/// The output file is only created once the input has been read and parsed,
/// so a missing or malformed input leaves the output path untouched.
///
/// # Arguments
/// * `dsse_file` - Path to the input DSSE attestation file
/// * `output_file` - Path to write the PEP 740 attestation to (created or overwritten)
///
/// # Errors
/// Returns error if the input cannot be read, is not a JSON object, or the
/// output cannot be written
pub fn convert_file(dsse_file: &Path, output_file: &Path) -> Result<()> {
    trace!("read {}.", dsse_file.display());

    let input = fs::read_to_string(dsse_file)
        .with_context(|| format!("Failed to read DSSE file '{}'", dsse_file.display()))?;

    let envelope = dsse::Envelope::try_from_json_string(&input)
        .with_context(|| format!("Failed to parse DSSE envelope '{}'", dsse_file.display()))?;

    let attestation = pep740::convert(&envelope).into_json_string()?;

    trace!("write {}. size: {}", output_file.display(), attestation.len());

    fs::write(output_file, attestation).with_context(|| {
        format!(
            "Failed to write PEP 740 attestation '{}'",
            output_file.display()
        )
    })?;

    debug!(
        "Converted '{}' to '{}'.",
        dsse_file.display(),
        output_file.display()
    );

    Ok(())
}
