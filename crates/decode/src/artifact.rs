use crate::scheme::Scheme;

/// Script fragments joined together with the host glue.
///
/// Built once per [`SandboxedDecoder`](crate::SandboxedDecoder) and shared by
/// every session it creates until the decoder's cache is cleared.
#[derive(Debug)]
pub struct CompiledArtifact {
    source: String,
    hash: blake3::Hash,
}

impl CompiledArtifact {
    pub(crate) fn assemble(scheme: &Scheme, fragments: &[String]) -> Self {
        let mut source = fragments.join(";\n");
        source.push_str(";\n");
        source.push_str(&scheme.glue());
        Self {
            hash: blake3::hash(source.as_bytes()),
            source,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// BLAKE3 hash of the assembled source; changes whenever the site rotates
    /// its scripts.
    pub fn hash(&self) -> &blake3::Hash {
        &self.hash
    }
}
