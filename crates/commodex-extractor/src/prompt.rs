//! Prompt engineering for commodity-strategy extraction.

use commodex_domain::ExtractionPrompt;

/// Builds the instruction pair sent to the completion endpoint.
///
/// The contract is deterministic: the same document text always produces the
/// same prompt. Document text is interpolated verbatim — sizing decisions
/// belong to the chunker, never here.
pub struct PromptBuilder {
    document: String,
}

impl PromptBuilder {
    /// Create a prompt builder for the given document text.
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            document: document.into(),
        }
    }

    /// Build the complete extraction prompt.
    pub fn build(&self) -> ExtractionPrompt {
        ExtractionPrompt {
            system: SYSTEM_INSTRUCTIONS.to_string(),
            user: format!(
                "{FIELD_GUIDE}\n\nDocument content:\n{}\n\n{OUTPUT_REMINDER}",
                self.document
            ),
        }
    }
}

const SYSTEM_INSTRUCTIONS: &str = r#"You are an expert data extraction system specialized in analyzing commodity strategy documents.
Your task is to extract specific information from documents and structure it as a valid JSON object.
Focus only on extracting factual information present in the document.
When information is missing, use null or empty arrays rather than making up information."#;

const FIELD_GUIDE: &str = r#"Analyze the following commodity strategy document and extract this information into a JSON structure:

1. commodity_name: The name of the commodity being discussed (e.g., Sugar, Dairy, Oils)
2. responsible_managers: Who is responsible for this commodity, as an array of names
3. creation_date: When the document was created
4. valid_until: The expiration date of the strategy
5. cost_drivers: An object mapping cost components (like labor, raw materials, energy) to their percentages
6. quantitative_initiatives: An array of initiatives, each with id, description, value_eur and status
7. qualitative_initiatives: An array of non-monetary initiatives, each with id, title and description
8. swot_analysis: An object with string arrays for strengths, weaknesses, opportunities and threats
9. sustainability_factors: Any sustainability information such as deforestation risk or emissions"#;

const OUTPUT_REMINDER: &str = r#"Return ONLY a valid JSON object with no additional text.
If information is not available, include the key with null or an empty array."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_interpolates_document_verbatim() {
        let document = "--- Page 1 ---\nSugar strategy, manager J. Meier";
        let prompt = PromptBuilder::new(document).build();
        assert!(prompt.user.contains(document));
    }

    #[test]
    fn prompt_names_all_nine_fields() {
        let prompt = PromptBuilder::new("doc").build();
        for field in [
            "commodity_name",
            "responsible_managers",
            "creation_date",
            "valid_until",
            "cost_drivers",
            "quantitative_initiatives",
            "qualitative_initiatives",
            "swot_analysis",
            "sustainability_factors",
        ] {
            assert!(prompt.user.contains(field), "missing field {field}");
        }
    }

    #[test]
    fn prompt_forbids_fabrication() {
        let prompt = PromptBuilder::new("doc").build();
        assert!(prompt.system.contains("rather than making up information"));
        assert!(prompt.user.contains("Return ONLY a valid JSON object"));
    }

    #[test]
    fn same_document_builds_same_prompt() {
        let a = PromptBuilder::new("stable input").build();
        let b = PromptBuilder::new("stable input").build();
        assert_eq!(a, b);
    }
}
