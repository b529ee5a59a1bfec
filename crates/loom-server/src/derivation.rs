//! Derivation Guard (C8): the duplicate-content and depth-cap checks
//! shared by the `check-derivation` probe and the write path that follows
//! it (§4.8).

use loom_core::constants::MAX_DERIVATION_DEPTH;
use loom_core::errors::{DerivationError, LoomError, LoomResult};
use loom_core::models::DerivationCheck;
use loom_storage::StorageEngine;

/// Computes `{duplicate, depth}` without writing anything. Both the
/// pre-flight probe and the extraction pipeline call this before deciding
/// whether to insert a memory.
pub fn evaluate(
    storage: &StorageEngine,
    owner_id: &str,
    content: &str,
    source_agent: &str,
    derived_from_memory_id: Option<&str>,
) -> LoomResult<DerivationCheck> {
    let content_hash = loom_core::models::Memory::compute_content_hash(owner_id, content);
    let duplicate = storage.find_current_memory_by_content_hash(owner_id, &content_hash)?.is_some();

    let depth = match derived_from_memory_id {
        None => 0,
        Some(source_id) => {
            let source = storage.get_memory(source_id)?.ok_or_else(|| {
                LoomError::Derivation(DerivationError::SourceNotFound { id: source_id.to_string() })
            })?;
            source.derivation_depth + u32::from(source.source_agent != source_agent)
        }
    };

    Ok(DerivationCheck { duplicate, depth })
}

/// Same as [`evaluate`] but returns `LoomError::Derivation` outright when
/// the candidate would be rejected, for callers on the write path that
/// want `?` rather than inspecting the checked result (§4.8).
pub fn guard(
    storage: &StorageEngine,
    owner_id: &str,
    content: &str,
    source_agent: &str,
    derived_from_memory_id: Option<&str>,
) -> LoomResult<DerivationCheck> {
    let check = evaluate(storage, owner_id, content, source_agent, derived_from_memory_id)?;
    if check.duplicate {
        let content_hash = loom_core::models::Memory::compute_content_hash(owner_id, content);
        return Err(LoomError::Derivation(DerivationError::DuplicateContent { content_hash }));
    }
    if check.depth > MAX_DERIVATION_DEPTH {
        return Err(LoomError::Derivation(DerivationError::DepthExceeded {
            depth: check.depth,
            max: MAX_DERIVATION_DEPTH,
        }));
    }
    Ok(check)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use loom_core::models::{Memory, MemoryKind};
    use loom_storage::StorageEngine;

    use super::*;

    fn seed_memory(storage: &StorageEngine, owner_id: &str, content: &str, derivation_depth: u32, source_agent: &str) -> Memory {
        let now = Utc::now();
        let memory = Memory {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.to_string(),
            source_entry_id: "entry-1".to_string(),
            chunk_index: 0,
            kind: MemoryKind::Fact,
            content: content.to_string(),
            confidence: 0.9,
            valid_from: now,
            valid_until: None,
            source_agent: source_agent.to_string(),
            derivation_depth,
            derived_from: None,
            content_hash: Memory::compute_content_hash(owner_id, content),
        };
        storage.insert_memory(&memory).unwrap();
        memory
    }

    #[test]
    fn rejects_duplicate_content_for_the_same_owner() {
        let storage = StorageEngine::open_in_memory(2).unwrap();
        seed_memory(&storage, "owner-1", "prefers dark mode", 0, "code-assistant");

        let check = evaluate(&storage, "owner-1", "prefers dark mode", "code-assistant", None).unwrap();
        assert!(check.duplicate);

        let err = guard(&storage, "owner-1", "prefers dark mode", "code-assistant", None).unwrap_err();
        assert!(matches!(err, LoomError::Derivation(DerivationError::DuplicateContent { .. })));
    }

    #[test]
    fn accepts_novel_content_from_a_fresh_owner() {
        let storage = StorageEngine::open_in_memory(2).unwrap();
        let check = guard(&storage, "owner-1", "prefers dark mode", "code-assistant", None).unwrap();
        assert!(!check.duplicate);
        assert_eq!(check.depth, 0);
    }

    #[test]
    fn depth_only_grows_when_the_deriving_agent_changes() {
        let storage = StorageEngine::open_in_memory(2).unwrap();
        let source = seed_memory(&storage, "owner-1", "source fact", 1, "code-assistant");

        let same_agent = evaluate(&storage, "owner-1", "new fact", "code-assistant", Some(&source.id)).unwrap();
        assert_eq!(same_agent.depth, 1, "same source_agent shouldn't bump depth");

        let other_agent = evaluate(&storage, "owner-1", "new fact", "chat-assistant", Some(&source.id)).unwrap();
        assert_eq!(other_agent.depth, 2, "a cross-agent derivation bumps depth by one");
    }

    #[test]
    fn rejects_a_derivation_past_the_depth_cap() {
        let storage = StorageEngine::open_in_memory(2).unwrap();
        let source = seed_memory(&storage, "owner-1", "source fact", MAX_DERIVATION_DEPTH, "code-assistant");

        let err = guard(&storage, "owner-1", "one step too deep", "chat-assistant", Some(&source.id)).unwrap_err();
        assert!(matches!(err, LoomError::Derivation(DerivationError::DepthExceeded { .. })));
    }

    #[test]
    fn rejects_derivation_from_an_unknown_source_memory() {
        let storage = StorageEngine::open_in_memory(2).unwrap();
        let err = guard(&storage, "owner-1", "content", "code-assistant", Some("missing-id")).unwrap_err();
        assert!(matches!(err, LoomError::Derivation(DerivationError::SourceNotFound { .. })));
    }
}
