use serde::{Deserialize, Serialize};

pub const DEFAULT_INSTRUCTIONS: &str = "Tu es un assistant pédagogique.

Règles obligatoires :
- Réponds UNIQUEMENT à la question de l'utilisateur (pas aux questions présentes dans le document).
- N'invente rien. Utilise uniquement le CONTEXTE fourni.
- Si la réponse n'est pas dans le contexte, réponds : \"Je ne sais pas.\"
- Si l'utilisateur demande \"oui ou non\", réponds uniquement par \"Oui\" ou \"Non\" (un seul mot).";

/// Fixed prompt layout: instructions, history, context, question.
/// Only the instruction wording is configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub instructions: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self { instructions: DEFAULT_INSTRUCTIONS.to_string() }
    }
}

impl PromptTemplate {
    pub fn new(instructions: impl Into<String>) -> Self {
        Self { instructions: instructions.into() }
    }

    pub fn render(&self, history: &str, context: &str, question: &str) -> String {
        format!(
            "{instructions}\n\nHISTORIQUE (pour comprendre la conversation) :\n{history}\n\nCONTEXTE :\n{context}\n\nQUESTION UTILISATEUR :\n{question}\n\nRÉPONSE :\n",
            instructions = self.instructions.trim_end(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_appear_in_order() {
        let prompt = PromptTemplate::default().render("User: a\nAssistant: b", "Paris est en France.", "Où est Paris ?");
        let positions: Vec<usize> = ["Tu es un assistant", "HISTORIQUE", "User: a", "CONTEXTE", "Paris est en France.", "QUESTION UTILISATEUR", "Où est Paris ?", "RÉPONSE :"]
            .iter()
            .map(|needle| prompt.find(needle).expect(needle))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{prompt}");
    }

    #[test]
    fn custom_instructions_replace_the_default() {
        let prompt = PromptTemplate::new("Answer briefly.").render("", "ctx", "q");
        assert!(prompt.starts_with("Answer briefly.\n\n"));
        assert!(!prompt.contains("pédagogique"));
    }
}
