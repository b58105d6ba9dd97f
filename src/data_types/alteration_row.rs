
/// One finished matrix row for one gene, aligned to the live samples of the profile
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneticAlterationRow {
    genetic_profile_id: u32,
    entrez_gene_id: i64,
    values: Vec<String>
}

impl GeneticAlterationRow {
    pub fn new(genetic_profile_id: u32, entrez_gene_id: i64, values: Vec<String>) -> Self {
        Self {
            genetic_profile_id,
            entrez_gene_id,
            values
        }
    }

    /// Storage format for the value vector: comma-joined with a trailing comma
    pub fn joined_values(&self) -> String {
        let mut joined = String::new();
        for value in self.values.iter() {
            joined.push_str(value);
            joined.push(',');
        }
        joined
    }

    // getters
    pub fn genetic_profile_id(&self) -> u32 {
        self.genetic_profile_id
    }

    pub fn entrez_gene_id(&self) -> i64 {
        self.entrez_gene_id
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_values() {
        let row = GeneticAlterationRow::new(1, 7157, vec!["-2".to_string(), "".to_string(), "0.5".to_string()]);
        assert_eq!(row.joined_values(), "-2,,0.5,");
        let empty = GeneticAlterationRow::new(1, 7157, vec![]);
        assert_eq!(empty.joined_values(), "");
    }
}
