//! Officer Quorum Engine
//!
//! Decides when a sensitive administrative action has gathered enough
//! officer approvals to proceed. Each action runs inside an
//! [`AuthorizationSession`]: officers approve or reject, the required
//! quorum is re-resolved from scratch after every decision, and the
//! session moves to `Authorized` on exactly one decision.
//!
//! # Components
//!
//! - [`threshold`]: resolves the dynamic quorum for a module
//! - [`validator`]: pure check of recorded decisions against module rules
//! - [`session`]: the per-session state machine
//! - [`service`]: concurrent entry points over many sessions, with events
//!
//! # Example
//!
//! ```
//! use quorum_engine::{AuthorizationService, EngineConfig};
//! use quorum_types::{AuthorizationModule, CredentialProof, OfficerDecision, OfficerRole};
//!
//! let service = AuthorizationService::new(EngineConfig::default());
//! let session = service
//!     .create_session(
//!         AuthorizationModule::Settings,
//!         "Change organisation name",
//!         OfficerRole::President,
//!         None,
//!     )
//!     .unwrap();
//!
//! let proof = CredentialProof::none();
//! service
//!     .submit_decision(&session.id, OfficerRole::President, OfficerDecision::Approved, &proof)
//!     .unwrap();
//! let receipt = service
//!     .submit_decision(&session.id, OfficerRole::Secretary, OfficerDecision::Approved, &proof)
//!     .unwrap();
//!
//! assert!(receipt.became_authorized());
//! ```

#![deny(unsafe_code)]

pub mod clock;
pub mod config;
pub mod credentials;
pub mod events;
pub mod service;
pub mod session;
pub mod threshold;
pub mod validator;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{EngineConfig, EventConfig, SessionConfig};
pub use credentials::{CredentialVerifier, NonEmptyProofVerifier, TrustingVerifier};
pub use events::{SessionEvent, SessionEventKind};
pub use service::{AuthorizationService, DecisionReceipt};
pub use session::{AuthorizationSession, SessionView};
pub use threshold::{resolve_quorum, QuorumReason, ResolvedQuorum};
pub use validator::{validate, UnmetRequirement, ValidationResult};
