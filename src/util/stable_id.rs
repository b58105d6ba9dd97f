
/// TCGA barcodes have a special structure, e.g. "TCGA-A1-A0SB-01A-11D"
const TCGA_PREFIX: &str = "TCGA";
/// Sample type appended when a barcode only names the patient
const DEFAULT_TUMOR_TYPE: &str = "01";

fn is_tcga_barcode(stable_id: &str) -> bool {
    stable_id.starts_with(TCGA_PREFIX) && stable_id.split('-').count() >= 3
}

/// Normalizes a sample header into the stable sample id used for lookups.
/// TCGA barcodes are trimmed to "TCGA-XX-XXXX-NN"; anything else is returned trimmed.
/// # Arguments
/// * `raw` - the header text of a sample column
pub fn sample_stable_id(raw: &str) -> String {
    let raw = raw.trim();
    if !is_tcga_barcode(raw) {
        return raw.to_string();
    }

    let parts: Vec<&str> = raw.split('-').collect();
    let sample_type: &str = match parts.get(3) {
        // the vial letter is not part of the sample
        Some(st) if !st.is_empty() => st.get(..2).unwrap_or(st),
        _ => DEFAULT_TUMOR_TYPE
    };
    format!("{}-{}-{}-{sample_type}", parts[0], parts[1], parts[2])
}

/// Returns the patient id that a sample id belongs to; for non-TCGA ids this is the id itself.
/// # Arguments
/// * `raw` - the header text of a sample column
pub fn patient_stable_id(raw: &str) -> String {
    let raw = raw.trim();
    if !is_tcga_barcode(raw) {
        return raw.to_string();
    }
    raw.split('-').take(3).collect::<Vec<&str>>().join("-")
}

/// Returns true if the sample id encodes a normal (non-tumor) sample, i.e. TCGA sample types 10-19.
/// # Arguments
/// * `raw` - the header text of a sample column
pub fn is_normal(raw: &str) -> bool {
    let stable_id = sample_stable_id(raw);
    if !is_tcga_barcode(&stable_id) {
        return false;
    }
    match stable_id.split('-').nth(3).and_then(|st| st.parse::<u8>().ok()) {
        Some(sample_type) => (10..20).contains(&sample_type),
        None => false
    }
}
