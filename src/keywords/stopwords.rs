use std::collections::HashSet;
use std::sync::LazyLock;

/// Low-information query tokens (Portuguese function words plus generic domain terms).
///
/// Applied to queries only, never to corpus text.
pub static STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        // articles
        "o", "a", "os", "as", "um", "uma", "uns", "umas",
        // prepositions and contractions
        "de", "do", "da", "dos", "das", "em", "no", "na", "nos", "nas", "por", "pelo", "pela",
        "pelos", "pelas", "para", "pra", "com", "sem", "sob", "sobre", "entre", "até", "ao",
        "aos", "à", "às", "num", "numa", "dum", "duma", "desde", "contra", "perante",
        // pronouns
        "eu", "tu", "ele", "ela", "nós", "vós", "eles", "elas", "você", "vocês", "me", "te",
        "se", "lhe", "lhes", "mim", "ti", "si", "meu", "minha", "meus", "minhas", "teu",
        "tua", "seu", "sua", "seus", "suas", "nosso", "nossa", "isso", "isto", "aquilo",
        "esse", "essa", "este", "esta", "aquele", "aquela", "que", "quem", "qual", "quais",
        "cujo", "cuja",
        // conjunctions
        "e", "ou", "mas", "porém", "pois", "porque", "como", "quando", "onde", "então",
        "nem", "também", "já",
        // auxiliary and light verbs
        "é", "são", "foi", "era", "ser", "estar", "está", "estão", "tem", "têm", "ter",
        "há", "haver", "faz", "fazer", "pode", "posso", "devo", "deve",
        // question scaffolding and generic domain terms
        "diz", "dizem", "fala", "falam", "bíblia", "biblia", "bíblico", "bíblica",
        "versículo", "versículos", "versiculo", "versiculos", "texto", "textos", "passagem",
        "passagens", "trecho", "trechos", "escritura", "escrituras", "significa", "quero",
        "saber", "explique", "explica", "algum", "alguma", "alguns", "algumas",
        "muito", "mais", "menos", "não",
    ]
    .into_iter()
    .collect()
});

/// Returns `true` if `token` (already lowercased) is a stop-word.
#[inline]
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}
