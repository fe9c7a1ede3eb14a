use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static LINK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:https?|www)\S+").expect("valid link regex"));
static SYMBOL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid symbol regex"));
static DIGIT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit regex"));

const MIN_TOKEN_CHARS: usize = 3;

#[rustfmt::skip]
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // pt
        "de", "a", "o", "que", "e", "do", "da", "em", "um", "para", "é", "com", "não",
        "uma", "os", "no", "se", "na", "por", "mais", "as", "dos", "como", "mas", "ao",
        "ele", "das", "à", "seu", "sua", "ou", "quando", "muito", "nos", "já", "eu",
        "também", "só", "pelo", "pela", "até", "isso", "ela", "entre", "depois", "sem",
        "mesmo", "aos", "seus", "quem", "nas", "me", "esse", "eles", "você", "essa",
        "num", "nem", "suas", "meu", "às", "minha", "numa", "pelos", "elas", "qual",
        "nós", "lhe", "deles", "essas", "esses", "pelas", "este", "dele", "tu", "te",
        "vocês", "vos", "lhes", "meus", "minhas", "teu", "tua", "teus", "tuas", "nosso",
        "nossa", "nossos", "nossas", "dela", "delas", "esta", "estes", "estas", "aquele",
        "aquela", "aqueles", "aquelas", "isto", "aquilo", "ser", "foi", "ter", "sido",
        // en
        "the", "and", "is", "in", "to", "of", "for", "on", "with", "it",
        "that", "by", "at", "from", "this", "be", "are", "or", "an", "was", "but",
        "not", "have", "has", "had", "we", "you", "they", "will", "can", "if", "their",
        "which", "about", "all", "were", "when", "there", "been", "who", "would", "what",
        "so", "up", "out", "them", "than", "she", "him", "her", "could", "should",
    ]
    .into_iter()
    .collect()
});

/// Reduces raw email text to lowercase topical tokens.
///
/// URLs, addresses, punctuation, digits, stopwords and tokens shorter than
/// three characters are dropped; surviving tokens keep their original order.
/// The output is a fixed point: `normalize(&normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let without_links = LINK_REGEX.replace_all(&lowered, "");

    let without_addresses = without_links
        .split_whitespace()
        .filter(|chunk| !chunk.contains('@'))
        .collect::<Vec<_>>()
        .join(" ");

    let without_symbols = SYMBOL_REGEX.replace_all(&without_addresses, " ");
    let without_digits = DIGIT_REGEX.replace_all(&without_symbols, "");

    without_digits
        .split_whitespace()
        .filter(|token| keep_token(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_link_or_address(chunk: &str) -> bool {
    chunk.starts_with("http") || chunk.starts_with("www") || chunk.contains('@')
}

// Digit and symbol stripping can expose a link prefix ("ww1wx" -> "wwwx"), so
// the link check runs again on the final tokens.
fn keep_token(token: &str) -> bool {
    token.chars().count() >= MIN_TOKEN_CHARS
        && !STOPWORDS.contains(token)
        && !is_link_or_address(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_noise_and_keeps_order() {
        let text = "Olá, equipe! Preciso de SUPORTE urgente no pedido #4521: \
                    veja https://exemplo.com/pedido?id=1 ou escreva para joao@empresa.com.br";
        assert_eq!(
            normalize(text),
            "olá equipe preciso suporte urgente pedido veja escreva"
        );
    }

    #[test]
    fn removes_links_glued_to_other_text() {
        assert_eq!(normalize("Link:https://exemplo.com/pedido/final"), "link");
        assert_eq!(normalize("(www.exemplo.com/suporte)"), "");
        assert_eq!(
            normalize("acesse <https://portal.empresa.com.br/chamado> hoje"),
            "acesse hoje"
        );
    }

    #[test]
    fn lowercases_accented_letters() {
        assert_eq!(normalize("REUNIÃO AMANHÃ ÀS DEZ"), "reunião amanhã dez");
    }

    #[test]
    fn removes_digits_inside_words() {
        assert_eq!(normalize("abc123def 2024"), "abcdef");
    }

    #[test]
    fn drops_english_stopwords_and_short_tokens() {
        assert_eq!(
            normalize("Thank you for the quick reply, it is OK"),
            "thank quick reply"
        );
    }

    #[test]
    fn empty_and_noise_only_inputs_yield_empty_string() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t  "), "");
        assert_eq!(normalize("🎉🎉 !!! 123 @ www"), "");
        assert_eq!(normalize("de a o que e do"), "");
    }

    #[test]
    fn keeps_non_latin_words() {
        assert_eq!(normalize("Привет, мир! 你好世界"), "привет мир 你好世界");
    }

    #[test]
    fn output_never_contains_noise() {
        let samples = [
            "Segue o relatório (v2.1) em anexo - ver www.site.com.",
            "Contato: suporte@acme.io / +55 11 99999-0000",
            "(httpbin) [www2] ftp://files.example.org",
            "Feliz Natal!!! 🎄 Boas festas a todos",
            "ÉÉÉ àààà 42abc ___ tab\tseparated",
        ];
        for sample in samples {
            let out = normalize(sample);
            for token in out.split(' ').filter(|t| !t.is_empty()) {
                assert!(token.chars().count() > 2, "short token {token:?} in {out:?}");
                assert!(!token.chars().any(|c| c.is_numeric()), "digit in {out:?}");
                assert!(!token.contains('@'), "address in {out:?}");
                assert!(!token.starts_with("http") && !token.starts_with("www"));
                assert!(!STOPWORDS.contains(token), "stopword {token:?}");
                assert!(token.chars().all(|c| c.is_alphanumeric() || c == '_' || !c.is_ascii()));
            }
        }
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "",
            "Olá, equipe! Preciso de SUPORTE no pedido #4521.",
            "(httpbin) [www2] 1www ab.cd não-sei ww1wx Link:https://x.io/a",
            "Feliz Natal!!! 🎄 Boas festas a todos",
            "REUNIÃO AMANHÃ ÀS DEZ, confirma?",
        ];
        for sample in samples {
            let once = normalize(sample);
            assert_eq!(normalize(&once), once, "not a fixed point for {sample:?}");
        }
    }
}
