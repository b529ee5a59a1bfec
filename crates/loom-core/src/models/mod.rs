pub mod agent;
pub mod chain;
pub mod chat;
pub mod coordination;
pub mod entry;
pub mod memory;
pub mod relationship;
pub mod search;
pub mod task;

pub use agent::{AgentLevel, AgentRegistration, Provenance};
pub use chain::{ChainRecord, ChainRecordKind, ChainVerification, CHAIN_GENESIS_HASH};
pub use chat::{AppendRequest, AppendResponse, ChatMessage, ChatReaction, ExternalSessionKey, MessageContent, MessageRole, SessionRecord};
pub use coordination::{CoordinationState, CoordinationStats};
pub use entry::{Asset, Entry, EntryType, Representation, RepresentationForm};
pub use memory::{DerivationCheck, DerivationRequest, Memory, MemoryCandidate, MemoryKind};
pub use relationship::{Relationship, RelationshipType};
pub use search::{Attribution, SearchHit, SearchRequest, SearchResponse, SearchType};
pub use task::{ClaimResult, GtdBucket};
