//! Fixed prompt templates, one substitution point each.

/// Builds the prompt that opens a story from a seed scene.
#[must_use]
pub fn start_prompt(seed_scene: &str) -> String {
    format!(
        "Você é um roteirista criativo criando uma história em quadrinhos interativa. \
Comece uma história baseada nesta cena: {seed_scene}

Escreva um parágrafo de abertura que prepare o cenário. Em seguida, forneça exatamente \
três escolhas empolgantes para o que o Hulk deve fazer a seguir.

A história e as escolhas devem ser em português do Brasil.

Retorne sua resposta APENAS como um objeto JSON válido que corresponda ao schema definido."
    )
}

/// Builds the prompt that advances a story by one paragraph.
///
/// `history` is every transcript text so far, in order, choice echoes
/// included.
#[must_use]
pub fn continue_prompt(history: &[String]) -> String {
    let story_so_far = history.join("\n\n");
    format!(
        "Você é um roteirista criativo continuando uma história em quadrinhos interativa.

Aqui está a história até agora:
---
{story_so_far}
---

Com base na última escolha do usuário, continue a história com um novo parágrafo curto e \
dramático (2-4 frases). Em seguida, forneça exatamente três novas escolhas distintas e \
empolgantes para o usuário fazer a seguir.

A história e as escolhas devem ser em português do Brasil.

Retorne sua resposta APENAS como um objeto JSON válido que corresponda ao schema definido."
    )
}

/// Wraps a story paragraph in the illustration style prompt.
#[must_use]
pub fn image_prompt(story_text: &str) -> String {
    format!(
        "Ilustração em estilo de painel de quadrinhos vintage da Marvel: {story_text}. \
Ação dramática e dinâmica, tintas fortes, cores de matriz de pontos, sem texto."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_prompt_embeds_seed_and_asks_for_three_choices() {
        let prompt = start_prompt("X");

        assert!(prompt.contains("nesta cena: X\n"));
        assert!(prompt.contains("exatamente três escolhas"));
        assert!(prompt.contains("português do Brasil"));
    }

    #[test]
    fn test_continue_prompt_joins_history_in_order() {
        let history = vec![
            "Cena inicial.".to_owned(),
            "Hulk pula.".to_owned(),
            "> Você escolheu: Correr".to_owned(),
        ];

        let prompt = continue_prompt(&history);

        assert!(prompt.contains("---\nCena inicial.\n\nHulk pula.\n\n> Você escolheu: Correr\n---"));
        assert!(prompt.contains("exatamente três novas escolhas"));
    }

    #[test]
    fn test_image_prompt_wraps_story_text() {
        let prompt = image_prompt("Hulk esmaga um tanque");

        assert!(prompt.starts_with("Ilustração em estilo de painel de quadrinhos"));
        assert!(prompt.contains(": Hulk esmaga um tanque. Ação dramática"));
        assert!(prompt.ends_with("sem texto."));
    }
}
