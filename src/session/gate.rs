/// Session gate: everything is locked behind sign-in, and a first-time
/// user must finish onboarding before the main surface opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    NeedsOnboarding,
    Ready,
}

/// Observations the surrounding session feeds the gate. `SignedIn` mirrors
/// the identity provider's auth-state callback and may re-fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { needs_onboarding: bool },
    OnboardingCompleted,
    SignedOut,
}

impl SessionState {
    /// Next state for an event. Events that make no sense in the current
    /// state leave it unchanged.
    #[must_use]
    pub fn apply(self, event: SessionEvent) -> SessionState {
        match (self, event) {
            (_, SessionEvent::SignedOut) => SessionState::Unauthenticated,
            (_, SessionEvent::SignedIn { needs_onboarding }) => {
                if needs_onboarding {
                    SessionState::NeedsOnboarding
                } else {
                    SessionState::Ready
                }
            }
            (SessionState::NeedsOnboarding, SessionEvent::OnboardingCompleted) => {
                SessionState::Ready
            }
            (state, SessionEvent::OnboardingCompleted) => state,
        }
    }
}
