use std::sync::Arc;

use sourcemap::{DecodedMap, SourceMap};

use crate::core::engine::traits::{Bias, OriginalPosition, PositionResolver};

#[derive(Debug, Clone)]
struct Mapping {
    dst_line: u32,
    dst_col: u32,
    source: Option<Arc<str>>,
    src_line: u32,
}

impl Mapping {
    fn position(&self) -> (u32, u32) {
        (self.dst_line, self.dst_col)
    }
}

/// Position resolver backed by a decoded source map (revision 3).
///
/// Mappings are flattened into a vector sorted by generated position so that
/// both bias directions are a single binary search.
#[derive(Debug, Clone)]
pub struct SourceMapResolver {
    source_root: String,
    mappings: Vec<Mapping>,
}

impl SourceMapResolver {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, sourcemap::Error> {
        // indexed maps are flattened into one regular map
        match sourcemap::decode_slice(bytes)? {
            DecodedMap::Regular(map) => Ok(Self::new(&map)),
            DecodedMap::Index(index) => Ok(Self::new(&index.flatten()?)),
            DecodedMap::Hermes(hermes) => Ok(Self::new(&hermes)),
        }
    }

    pub fn new(map: &SourceMap) -> Self {
        let sources: Vec<Arc<str>> = map.sources().map(Arc::from).collect();

        let mut mappings: Vec<Mapping> = map
            .tokens()
            .map(|token| Mapping {
                dst_line: token.get_dst_line(),
                dst_col: token.get_dst_col(),
                source: token
                    .get_source()
                    .and_then(|_| sources.get(token.get_src_id() as usize).cloned()),
                src_line: token.get_src_line(),
            })
            .collect();
        mappings.sort_by_key(Mapping::position);

        Self {
            source_root: map.get_source_root().unwrap_or_default().to_string(),
            mappings,
        }
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    fn find(&self, line: u32, column: u32, bias: Bias) -> Option<&Mapping> {
        // generated lines are 0-based inside the map
        let needle = (line.checked_sub(1)?, column);
        match bias {
            Bias::LeastUpperBound => {
                let idx = self.mappings.partition_point(|m| m.position() < needle);
                self.mappings.get(idx)
            }
            Bias::GreatestLowerBound => {
                let idx = self.mappings.partition_point(|m| m.position() <= needle);
                idx.checked_sub(1).map(|idx| &self.mappings[idx])
            }
        }
    }
}

impl PositionResolver for SourceMapResolver {
    fn source_root(&self) -> &str {
        &self.source_root
    }

    fn original_position_for(
        &self,
        line: u32,
        column: u32,
        bias: Bias,
    ) -> Option<OriginalPosition> {
        let mapping = self.find(line, column, bias)?;
        let source = mapping.source.as_ref()?;
        Some(OriginalPosition {
            source: source.to_string(),
            line: mapping.src_line + 1,
        })
    }
}
