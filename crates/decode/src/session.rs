//! Isolated guest execution.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use exn::ResultExt;
use rquickjs::context::EvalOptions;
use rquickjs::{Context, Ctx, Function, Object, Runtime, Value};
use tracing::instrument;

use crate::artifact::CompiledArtifact;
use crate::consts;
use crate::error::{ErrorKind, Result};
use crate::scheme::Scheme;

/// Resource limits applied to every guest execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Wall-clock budget for a single guest execution (loading the artifact,
    /// deriving the key, or decoding one token).
    pub timeout: Duration,
    /// Heap limit of the interpreter, in bytes.
    pub memory_limit: usize,
    /// Native stack limit of the interpreter, in bytes.
    pub max_stack_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            timeout: consts::DEFAULT_TIMEOUT,
            memory_limit: consts::DEFAULT_MEMORY_LIMIT,
            max_stack_size: consts::DEFAULT_MAX_STACK_SIZE,
        }
    }
}

/// Host-side deadline polled by the interpreter's interrupt handler.
///
/// The interrupt QuickJS raises is uncatchable, so guest code cannot swallow
/// it with `try`/`catch`.
#[derive(Debug, Clone, Default)]
struct Deadline(Arc<Mutex<Option<Instant>>>);

impl Deadline {
    fn arm(&self, budget: Duration) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = Some(Instant::now() + budget);
    }

    fn disarm(&self) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn expired(&self) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some_and(|deadline| Instant::now() >= deadline)
    }
}

/// Render a failed guest execution as a message, clearing the pending
/// exception from the context.
fn describe(ctx: &Ctx<'_>, err: rquickjs::Error) -> String {
    if !err.is_exception() {
        return err.to_string();
    }
    let thrown = ctx.catch();
    if let Some(exception) = thrown.as_exception() {
        return exception.message().unwrap_or_else(|| "exception without a message".to_string());
    }
    if let Some(message) = thrown.as_string().and_then(|s| s.to_string().ok()) {
        return message;
    }
    format!("{thrown:?}")
}

/// One isolated execution context with the compiled artifact and the page's
/// key-derivation expression already loaded.
///
/// Created by [`SandboxedDecoder::get_wrap_ka`](crate::SandboxedDecoder::get_wrap_ka).
/// Each session owns its own interpreter runtime, so nothing a guest does in
/// one session is visible to another.
///
/// The guest sees no host objects: only the ECMAScript standard library, a
/// fresh memo object, and no-op stand-ins for `alert`, `confirm`, `prompt`
/// and `location.reload`. Tokens go in as plain string arguments and decoded
/// values come out as plain strings.
///
/// Sessions are `Send + Sync`, but calls into one session are serialized
/// by the interpreter lock.
pub struct DecodeSession {
    context: Context,
    deadline: Deadline,
    limits: Limits,
    scheme: Arc<Scheme>,
    /// Host-owned copy of every successfully decoded token.
    memo: Mutex<HashMap<String, String>>,
}

impl DecodeSession {
    #[instrument(level = "debug", skip_all, fields(artifact = %artifact.hash()))]
    pub(crate) fn open(artifact: &CompiledArtifact, key_expression: &str, scheme: Arc<Scheme>, limits: Limits) -> Result<Self> {
        let runtime = Runtime::new().or_raise(|| ErrorKind::Runtime)?;
        runtime.set_memory_limit(limits.memory_limit);
        runtime.set_max_stack_size(limits.max_stack_size);
        let deadline = Deadline::default();
        let interrupt = deadline.clone();
        runtime.set_interrupt_handler(Some(Box::new(move || interrupt.expired())));
        let context = Context::full(&runtime).or_raise(|| ErrorKind::Runtime)?;

        let session = Self {
            context,
            deadline,
            limits,
            scheme,
            memo: Mutex::new(HashMap::new()),
        };
        session.install_globals()?;
        session.eval(artifact.source())?;
        // The key expression refers to symbols defined by the artifact.
        session.eval(key_expression)?;
        tracing::debug!("Decode session ready");
        Ok(session)
    }

    /// Decode a single token.
    ///
    /// Tokens already decoded by this session are answered from the memo
    /// without running guest code. The result is deterministic for the
    /// lifetime of the session.
    ///
    /// # Errors
    ///
    /// - [`ExecutionTimeout`](ErrorKind::ExecutionTimeout) if the guest runs
    ///   past its budget; nothing is memoized for the token.
    /// - [`Script`](ErrorKind::Script) if the guest throws.
    /// - [`TokenNotDecoded`](ErrorKind::TokenNotDecoded) if the guest
    ///   returns without storing a string for the token.
    pub async fn decode(&self, token: &str) -> Result<String> {
        if let Some(decoded) = self.memoized(token) {
            tracing::trace!(token, "Token answered from memo");
            return Ok(decoded);
        }

        let memo = self.scheme.memo.as_str();
        let trigger = self.scheme.trigger.as_str();
        let outcome = self.run(|ctx| {
            let globals = ctx.globals();
            let trigger: Function = globals.get(trigger)?;
            trigger.call::<_, Value>((token,))?;
            let memo: Object = globals.get(memo)?;
            let entry: Value = memo.get(token)?;
            entry.as_string().map(|s| s.to_string()).transpose()
        });

        match outcome {
            Ok(Some(decoded)) => {
                self.host_memo().insert(token.to_string(), decoded.clone());
                Ok(decoded)
            },
            Ok(None) => {
                self.forget(token);
                exn::bail!(ErrorKind::TokenNotDecoded(token.to_string()))
            },
            Err(err) => {
                self.forget(token);
                Err(err)
            },
        }
    }

    /// Number of tokens decoded so far.
    pub fn decoded(&self) -> usize {
        self.host_memo().len()
    }

    fn memoized(&self, token: &str) -> Option<String> {
        self.host_memo().get(token).cloned()
    }

    fn host_memo(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.memo.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn install_globals(&self) -> Result<()> {
        let memo = self.scheme.memo.as_str();
        self.run(|ctx| {
            let globals = ctx.globals();
            // Browser globals guest scripts like to poke at.
            globals.set("alert", Function::new(ctx.clone(), || {})?)?;
            globals.set("confirm", Function::new(ctx.clone(), || false)?)?;
            globals.set("prompt", Function::new(ctx.clone(), || None::<String>)?)?;
            let location = Object::new(ctx.clone())?;
            location.set("reload", Function::new(ctx.clone(), || {})?)?;
            globals.set("location", location)?;
            globals.set(memo, Object::new(ctx.clone())?)?;
            Ok(())
        })
    }

    /// Evaluate global code in sloppy mode. Site scripts routinely assign
    /// undeclared globals (`key = ...`), which strict mode rejects.
    fn eval(&self, source: &str) -> Result<()> {
        self.run(|ctx| {
            let mut options = EvalOptions::default();
            options.strict = false;
            ctx.eval_with_options::<Value, _>(source, options).map(|_| ())
        })
    }

    /// Drop whatever the guest memo holds for `token`, so a failed or
    /// interrupted call can never be read back as a success.
    fn forget(&self, token: &str) {
        let memo = self.scheme.memo.as_str();
        let removed = self.run(|ctx| {
            let memo: Object = ctx.globals().get(memo)?;
            memo.remove(token)
        });
        if let Err(err) = removed {
            tracing::debug!(token, error = %*err, "Unable to clear guest memo entry");
        }
    }

    /// Run `f` inside the context with the deadline armed.
    fn run<R>(&self, f: impl FnOnce(&Ctx<'_>) -> rquickjs::Result<R>) -> Result<R> {
        self.deadline.arm(self.limits.timeout);
        let outcome = self.context.with(|ctx| f(&ctx).map_err(|err| describe(&ctx, err)));
        let expired = self.deadline.expired();
        self.deadline.disarm();
        match outcome {
            Ok(value) => Ok(value),
            Err(_) if expired => {
                tracing::warn!(timeout = ?self.limits.timeout, "Guest script interrupted");
                exn::bail!(ErrorKind::ExecutionTimeout(self.limits.timeout))
            },
            Err(message) => exn::bail!(ErrorKind::Script(message)),
        }
    }
}
