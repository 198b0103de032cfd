//! Test fixtures for integration tests.

use std::path::PathBuf;

use lectio::{Corpus, StubEmbedder, VectorIndex};
use tempfile::TempDir;

pub const STUB_DIM: usize = 64;

/// Structured corpus: numbered books, a repeated text under two references, and a
/// blank line.
pub const SAMPLE_CORPUS: &str = "\
GN 1:1 No princípio criou Deus os céus e a terra.
GN 1:3 E disse Deus: Haja luz; e houve luz.
SL 23:1 O Senhor é o meu pastor, nada me faltará.
SL 119:105 Lâmpada para os meus pés é tua palavra, e luz para o meu caminho.
SL 14:1 Não há quem faça o bem.
SL 53:1 Não há quem faça o bem.
PV 3:5 Confia no Senhor de todo o teu coração.

MT 17:20 Se tiverdes fé como um grão de mostarda, direis a este monte: Passa daqui.
MC 11:22 Tende fé em Deus.
JO 2:11 Jesus principiou assim os seus sinais em Caná da Galileia.
JO 3:16 Porque Deus amou o mundo de tal maneira que deu o seu Filho unigênito.
1CO 13:4 O amor é paciente, o amor é bondoso.
1JO 4:8 Aquele que não ama não conhece a Deus; porque Deus é amor.
1JO 4:16 E nós conhecemos, e cremos no amor que Deus nos tem. Deus é amor.
EF 4:32 Antes sede uns para com os outros benignos, misericordiosos, perdoando-vos.";

/// Number of records in [`SAMPLE_CORPUS`].
pub const SAMPLE_CORPUS_RECORDS: usize = 15;

/// Text with no `REF BODY` lines at all: every line is one word.
pub const UNSTRUCTURED_TEXT: &str = "\
Salmos
Bem-aventurado_o_varão_que_não_anda_segundo_o_conselho_dos_ímpios
curto
Porque_o_Senhor_conhece_o_caminho_dos_justos";

pub fn write_temp_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("Failed to write fixture file");
    path
}

pub fn sample_corpus() -> Corpus {
    Corpus::parse(SAMPLE_CORPUS)
}

pub fn stub_embedder() -> StubEmbedder {
    StubEmbedder::new(STUB_DIM).expect("Failed to create stub embedder")
}

pub async fn stub_index(corpus: &Corpus) -> VectorIndex {
    VectorIndex::build(corpus, &stub_embedder())
        .await
        .expect("Failed to build stub index")
}
