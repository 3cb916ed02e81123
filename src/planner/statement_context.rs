use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::debug;

use crate::session::{ConfigurationError, SessionVariables, VariableValue};

static LOGGING_TARGET: &str = "optrs::planner";

/// Per-statement compilation state: a handle to the session's configuration,
/// a cache of values derived during this compilation, and the ledger of
/// single-statement overrides.
///
/// Created at statement start and discarded at statement end; never shared
/// across statements or connections. Dropping the context restores any
/// pending overrides, so abandoned compilations cannot leak a temporary
/// value into the next statement on the same session.
pub struct StatementContext {
    session_vars: Arc<Mutex<SessionVariables>>,
    cache: HashMap<String, Arc<dyn Any + Send + Sync>>,
    /// (key, previous value) pairs in application order, replayed in reverse
    override_ledger: Vec<(String, VariableValue)>,
    single_set_var: bool,
}

impl StatementContext {
    pub fn new(session_vars: Arc<Mutex<SessionVariables>>) -> Self {
        Self {
            session_vars,
            cache: HashMap::new(),
            override_ledger: vec![],
            single_set_var: false,
        }
    }

    fn lock_vars(&self) -> MutexGuard<'_, SessionVariables> {
        match self.session_vars.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn get_var(&self, key: &str) -> Result<VariableValue, ConfigurationError> {
        self.lock_vars().get(key)
    }

    pub fn get_int_var(&self, key: &str) -> Result<i64, ConfigurationError> {
        let value = self.get_var(key)?;
        value
            .as_int()
            .ok_or_else(|| ConfigurationError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                reason: "not an integer variable".to_string(),
            })
    }

    pub fn get_bool_var(&self, key: &str) -> Result<bool, ConfigurationError> {
        let value = self.get_var(key)?;
        value
            .as_bool()
            .ok_or_else(|| ConfigurationError::InvalidValue {
                key: key.to_string(),
                value: value.to_string(),
                reason: "not a boolean variable".to_string(),
            })
    }

    /// Install a temporary session value, recording the previous one on the
    /// override ledger for restoration at statement end.
    pub fn set_var_once(&mut self, key: &str, value: &str) -> Result<(), ConfigurationError> {
        let previous = self.lock_vars().set(key, value)?;
        debug!(
            target: LOGGING_TARGET,
            "set {}='{}' for one statement (was '{}')", key, value, previous
        );
        self.override_ledger.push((key.to_string(), previous));
        self.single_set_var = true;
        self.invalidate_cache(key);
        Ok(())
    }

    /// Whether a single-statement override is currently active.
    pub fn has_single_set_var(&self) -> bool {
        self.single_set_var
    }

    /// Replay the override ledger in reverse, putting every overridden
    /// session variable back to its pre-statement value and dropping cache
    /// entries keyed by the restored variables. Idempotent: the ledger is
    /// drained on the first call.
    pub fn restore_session_vars(&mut self) {
        let ledger = std::mem::take(&mut self.override_ledger);
        self.single_set_var = false;
        if ledger.is_empty() {
            return;
        }
        {
            let mut vars = self.lock_vars();
            for (key, previous) in ledger.iter().rev() {
                debug!(
                    target: LOGGING_TARGET,
                    "restore {}='{}' after statement", key, previous
                );
                vars.restore(key, previous.clone());
            }
        }
        for (key, _) in ledger.iter() {
            self.invalidate_cache(key);
        }
    }

    /// Look up a derived value cached under `key`, or compute and cache it.
    /// Entries must be safe to recompute: eviction only costs the lookup.
    pub fn get_or_cache<T: Any + Send + Sync>(
        &mut self,
        key: &str,
        compute: impl FnOnce() -> T,
    ) -> Arc<T> {
        if let Some(hit) = self.cache_get::<T>(key) {
            return hit;
        }
        let computed = Arc::new(compute());
        let entry: Arc<dyn Any + Send + Sync> = computed.clone();
        self.cache.insert(key.to_string(), entry);
        computed
    }

    pub fn cache_get<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.cache.get(key).and_then(|v| v.clone().downcast::<T>().ok())
    }

    pub fn invalidate_cache(&mut self, key: &str) {
        self.cache.remove(key);
    }
}

impl Drop for StatementContext {
    fn drop(&mut self) {
        // covers error and cancellation exits that skip the explicit call
        self.restore_session_vars();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::session::{ConfigurationError, EXEC_MEM_LIMIT, QUERY_TIMEOUT};

    fn build_session_vars() -> Arc<Mutex<SessionVariables>> {
        Arc::new(Mutex::new(SessionVariables::new()))
    }

    fn session_value(vars: &Arc<Mutex<SessionVariables>>, key: &str) -> VariableValue {
        vars.lock().unwrap().get(key).unwrap()
    }

    #[test]
    fn test_set_var_once_and_restore() {
        let vars = build_session_vars();
        let mut ctx = StatementContext::new(vars.clone());

        ctx.set_var_once(QUERY_TIMEOUT, "1800").unwrap();
        assert!(ctx.has_single_set_var());
        // during compilation the override is visible
        assert_eq!(ctx.get_int_var(QUERY_TIMEOUT).unwrap(), 1800);
        assert_eq!(session_value(&vars, QUERY_TIMEOUT), VariableValue::Int(1800));

        ctx.restore_session_vars();
        assert!(!ctx.has_single_set_var());
        assert_eq!(session_value(&vars, QUERY_TIMEOUT), VariableValue::Int(600));
    }

    #[test]
    fn test_restore_replays_ledger_in_reverse() {
        let vars = build_session_vars();
        let mut ctx = StatementContext::new(vars.clone());

        // the same key overridden twice restores the original value
        ctx.set_var_once(QUERY_TIMEOUT, "1800").unwrap();
        ctx.set_var_once(QUERY_TIMEOUT, "3600").unwrap();
        assert_eq!(ctx.get_int_var(QUERY_TIMEOUT).unwrap(), 3600);

        ctx.restore_session_vars();
        assert_eq!(session_value(&vars, QUERY_TIMEOUT), VariableValue::Int(600));
    }

    #[test]
    fn test_restore_is_idempotent() {
        let vars = build_session_vars();
        let mut ctx = StatementContext::new(vars.clone());

        ctx.set_var_once(QUERY_TIMEOUT, "1800").unwrap();
        ctx.restore_session_vars();
        // a later direct set must not be clobbered by a second restore
        vars.lock().unwrap().set(QUERY_TIMEOUT, "900").unwrap();
        ctx.restore_session_vars();
        assert_eq!(session_value(&vars, QUERY_TIMEOUT), VariableValue::Int(900));
    }

    #[test]
    fn test_failed_set_keeps_earlier_overrides_applied() {
        let vars = build_session_vars();
        let mut ctx = StatementContext::new(vars.clone());

        ctx.set_var_once(QUERY_TIMEOUT, "1800").unwrap();
        let err = ctx.set_var_once(QUERY_TIMEOUT, "0").unwrap_err();
        assert!(matches!(err, ConfigurationError::OutOfRange { .. }));

        // best-effort batch: the earlier override stays applied...
        assert_eq!(ctx.get_int_var(QUERY_TIMEOUT).unwrap(), 1800);
        // ...and is still restored at statement end
        ctx.restore_session_vars();
        assert_eq!(session_value(&vars, QUERY_TIMEOUT), VariableValue::Int(600));
    }

    #[test]
    fn test_cache_entry_for_overridden_key_absent_after_restore() {
        let vars = build_session_vars();
        let mut ctx = StatementContext::new(vars.clone());

        let derived = ctx.get_or_cache(QUERY_TIMEOUT, || 600_i64);
        assert_eq!(*derived, 600);
        assert!(ctx.cache_get::<i64>(QUERY_TIMEOUT).is_some());

        ctx.set_var_once(QUERY_TIMEOUT, "1800").unwrap();
        // invalidated at set time so the override window recomputes
        assert!(ctx.cache_get::<i64>(QUERY_TIMEOUT).is_none());

        let derived = ctx.get_or_cache(QUERY_TIMEOUT, || 1800_i64);
        assert_eq!(*derived, 1800);

        ctx.restore_session_vars();
        assert!(ctx.cache_get::<i64>(QUERY_TIMEOUT).is_none());
        // unrelated entries survive restoration
        ctx.get_or_cache(EXEC_MEM_LIMIT, || 1_i64);
        ctx.set_var_once(QUERY_TIMEOUT, "1800").unwrap();
        ctx.restore_session_vars();
        assert!(ctx.cache_get::<i64>(EXEC_MEM_LIMIT).is_some());
    }

    #[test]
    fn test_get_or_cache_memoizes() {
        let vars = build_session_vars();
        let mut ctx = StatementContext::new(vars);

        let mut calls = 0;
        ctx.get_or_cache("resolved_target", || -> i64 {
            calls += 1;
            42
        });
        let hit = ctx.get_or_cache("resolved_target", || -> i64 {
            panic!("cached entry must not recompute")
        });
        assert_eq!(*hit, 42);
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_drop_restores_pending_overrides() {
        let vars = build_session_vars();
        {
            let mut ctx = StatementContext::new(vars.clone());
            ctx.set_var_once(QUERY_TIMEOUT, "1800").unwrap();
            assert_eq!(session_value(&vars, QUERY_TIMEOUT), VariableValue::Int(1800));
            // compilation abandoned: no explicit restore before drop
        }
        assert_eq!(session_value(&vars, QUERY_TIMEOUT), VariableValue::Int(600));
    }
}
