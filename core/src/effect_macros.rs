//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants inside
//! reducers.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use recipebook_core::async_effect;
///
/// async_effect! {
///     let reply = provider.authenticate(mode, &identity, &secret).await;
///     Some(AuthAction::from_reply(reply))
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use recipebook_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_secs(3600),
///     action: AuthAction::AutoLogout
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Wrap an effect so it can be cancelled later with `Effect::Cancel(id)`
///
/// # Example
///
/// ```rust,ignore
/// use recipebook_core::{cancellable, delay};
///
/// cancellable! {
///     id: EXPIRY_TIMER,
///     effect: delay! { duration: remaining, action: AuthAction::AutoLogout }
/// }
/// ```
#[macro_export]
macro_rules! cancellable {
    (
        id: $id:expr,
        effect: $effect:expr
    ) => {
        $crate::effect::Effect::Cancellable {
            id: $id,
            effect: ::std::boxed::Box::new($effect),
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::effect::{Effect, EffectId};
    use std::time::Duration;

    #[derive(Clone, Debug)]
    enum TestAction {
        AsyncResult { value: i32 },
        TimeoutExpired,
    }

    #[test]
    fn test_async_effect_macro() {
        let effect = async_effect! {
            Some(TestAction::AsyncResult { value: 42 })
        };

        assert!(matches!(effect, Effect::Future(_)));
    }

    #[test]
    fn test_delay_macro() {
        let effect = delay! {
            duration: Duration::from_secs(30),
            action: TestAction::TimeoutExpired
        };

        assert!(matches!(effect, Effect::Delay { .. }));
    }

    #[test]
    fn test_cancellable_macro() {
        const TIMER: EffectId = EffectId::new("timer");

        let effect = cancellable! {
            id: TIMER,
            effect: delay! {
                duration: Duration::from_secs(30),
                action: TestAction::TimeoutExpired
            }
        };

        match effect {
            Effect::Cancellable { id, effect } => {
                assert_eq!(id, TIMER);
                assert!(matches!(*effect, Effect::Delay { .. }));
            },
            _ => unreachable!("cancellable! always builds Effect::Cancellable"),
        }
    }
}
