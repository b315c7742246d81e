//! Dashboard controller
//!
//! Couples a [`RegistrationApi`] with the [`ViewState`] reducer. The state
//! sits behind a `parking_lot::RwLock` and the lock is never held across
//! an await, so refreshes may overlap freely; the load epoch decides which
//! response is applied.

use crate::api::{EventScope, RegistrationApi};
use crate::error::ClientResult;
use parking_lot::RwLock;
use regdesk_tables::filters::FieldNames;
use regdesk_tables::state::{Action, ViewState};
use regdesk_types::StatusUpdate;

/// What happened to a completed refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
	/// The response was applied to the view
	Applied {
		/// Number of records loaded
		records: usize,
	},
	/// A newer refresh was started first, so this response was dropped
	Superseded,
}

/// Loads registrations into a shared view state and applies status changes
pub struct Dashboard<A> {
	api: A,
	state: RwLock<ViewState>,
}

impl<A: RegistrationApi> Dashboard<A> {
	/// Create a dashboard with an empty view
	pub fn new(api: A, fields: FieldNames) -> Self {
		Self {
			api,
			state: RwLock::new(ViewState::new(fields)),
		}
	}

	/// The backend in use
	pub fn api(&self) -> &A {
		&self.api
	}

	/// Copy of the current view state
	pub fn snapshot(&self) -> ViewState {
		self.state.read().clone()
	}

	/// Run a closure against the current view state without copying it
	pub fn with_state<R>(&self, f: impl FnOnce(&ViewState) -> R) -> R {
		f(&self.state.read())
	}

	/// Apply one action to the view state
	pub fn dispatch(&self, action: Action) {
		let mut guard = self.state.write();
		let current = std::mem::take(&mut *guard);
		*guard = current.reduce(action);
	}

	fn start_load(&self) -> u64 {
		let mut guard = self.state.write();
		let current = std::mem::take(&mut *guard);
		*guard = current.reduce(Action::LoadStarted);
		guard.epoch()
	}

	/// Apply a load completion; false when a newer load has started since
	fn finish_load(&self, epoch: u64, action: Action) -> bool {
		let mut guard = self.state.write();
		let current = std::mem::take(&mut *guard);
		let is_current = current.epoch() == epoch;
		*guard = current.reduce(action);
		is_current
	}

	/// Fetch the registrations for `scope` and replace the loaded list
	///
	/// On failure the previously loaded records stay in place and the error
	/// is recorded in the view. Authorization failures are returned as
	/// [`ClientError::Unauthorized`](crate::ClientError::Unauthorized) so the
	/// caller can redirect to login.
	pub async fn refresh(&self, scope: &EventScope) -> ClientResult<LoadOutcome> {
		let epoch = self.start_load();
		tracing::debug!(%scope, epoch, "loading registrations");

		match self.api.list_registrations(scope).await {
			Ok(records) => {
				let count = records.len();
				if !self.finish_load(epoch, Action::LoadSucceeded { epoch, records }) {
					tracing::debug!(%scope, epoch, "load superseded by a newer refresh");
					return Ok(LoadOutcome::Superseded);
				}
				tracing::info!(%scope, records = count, "loaded registrations");
				Ok(LoadOutcome::Applied { records: count })
			}
			Err(e) => {
				if e.is_unauthorized() {
					tracing::warn!(%scope, "registration listing not authorized");
				} else {
					tracing::warn!(%scope, error = %e, "failed to load registrations");
				}
				self.finish_load(
					epoch,
					Action::LoadFailed {
						epoch,
						message: e.to_string(),
					},
				);
				Err(e)
			}
		}
	}

	/// Send a status change and patch the local record on success
	///
	/// Failures are returned without retrying and leave the loaded records
	/// untouched.
	pub async fn update_status(&self, update: StatusUpdate) -> ClientResult<Option<String>> {
		match self.api.update_status(&update).await {
			Ok(message) => {
				tracing::info!(
					id = %update.id,
					status = %update.registration_status,
					payment_verified = update.payment_verified,
					"registration status updated"
				);
				self.dispatch(Action::RecordUpdated(update));
				Ok(message)
			}
			Err(e) => {
				tracing::warn!(id = %update.id, error = %e, "status update failed");
				Err(e)
			}
		}
	}
}

impl<A> std::fmt::Debug for Dashboard<A> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Dashboard")
			.field("state", &*self.state.read())
			.finish_non_exhaustive()
	}
}
