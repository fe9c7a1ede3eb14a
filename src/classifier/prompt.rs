/// System instruction sent alongside every classification prompt.
pub const SYSTEM_PROMPT: &str = "Responda SEMPRE com EXATAMENTE 2 linhas, sem Markdown e sem texto extra. \
Linha 1: 'CATEGORIA: PRODUTIVO' ou 'CATEGORIA: IMPRODUTIVO'. \
Linha 2: 'RESPOSTA: <resposta curta e profissional>'.";

pub const CATEGORY_LABEL: &str = "CATEGORIA:";
pub const REPLY_LABEL: &str = "RESPOSTA:";
pub const PRODUCTIVE_TOKEN: &str = "PRODUTIVO";
pub const UNPRODUCTIVE_TOKEN: &str = "IMPRODUTIVO";

/// Embeds the raw email text, unescaped, in the two-line output contract.
pub fn build_prompt(email_text: &str) -> String {
    format!(
        "Analise o seguinte email e realize duas tarefas:

1. CLASSIFICAÇÃO: Determine se o email é:
   - {PRODUCTIVE_TOKEN}: requer ação ou resposta, ou trata de trabalho, suporte, dúvidas ou solicitações
   - {UNPRODUCTIVE_TOKEN}: é apenas informativo, social, agradecimento, felicitação ou spam

2. RESPOSTA: Gere uma resposta curta, educada e profissional adequada ao contexto.

Email:
{email_text}

Regras obrigatórias de resposta:
- Responda com EXATAMENTE 2 linhas.
- Não use Markdown, listas, títulos, aspas, nem texto extra.
- A primeira linha deve começar com \"{CATEGORY_LABEL}\" seguido de {PRODUCTIVE_TOKEN} ou {UNPRODUCTIVE_TOKEN}.
- A segunda linha deve começar com \"{REPLY_LABEL}\" seguido da resposta.

Formato obrigatório (copie o formato, substituindo apenas os valores):
{CATEGORY_LABEL} {PRODUCTIVE_TOKEN}
{REPLY_LABEL} (sua resposta sugerida)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_email_verbatim() {
        let email = "Oi!\nPodem verificar o chamado #123? {obrigado} \"urgente\"";
        let prompt = build_prompt(email);
        assert!(prompt.contains(email));
    }

    #[test]
    fn states_two_line_contract() {
        let prompt = build_prompt("qualquer coisa");
        assert!(prompt.contains("EXATAMENTE 2 linhas"));
        assert!(prompt.contains("CATEGORIA: PRODUTIVO\nRESPOSTA:"));
        assert!(prompt.contains(UNPRODUCTIVE_TOKEN));
        assert!(prompt.contains("Não use Markdown"));
    }

    #[test]
    fn empty_email_still_produces_instructions() {
        let prompt = build_prompt("");
        assert!(prompt.contains("Email:\n\n"));
        assert!(prompt.starts_with("Analise o seguinte email"));
    }
}
