//! Deferred execution of engine operations on the rayon thread pool.
//!
//! A [`Deferred`] is the handle to a job that runs on a worker thread. It
//! resolves exactly once, either by being awaited as a [`Future`], by
//! blocking with [`Deferred::wait`], or by handing the outcome to one of two
//! continuations with [`Deferred::dispatch`].
//!
//! [`AsyncRecrypt`] wraps a [`RecryptScheme`] and returns a `Deferred` for
//! every fallible operation. Inputs are taken by value so a job never
//! borrows from, or mutates, anything the caller still holds.
//!
//! ```rust
//! use recrypt_engine::{AsyncRecrypt, PairingEngine, RecryptScheme};
//!
//! let engine = AsyncRecrypt::new(RecryptScheme::<PairingEngine>::default());
//! let signing = engine.generate_signing_key_pair().wait()?;
//! let alice = engine.generate_key_pair().wait()?;
//! let plaintext = engine.generate_plaintext().wait()?;
//!
//! let value = engine
//!     .encrypt(plaintext.clone(), *alice.public_key(), signing)
//!     .wait()?;
//! let decrypted = engine.decrypt(value, alice.private_key().clone()).dispatch(
//!     |err| panic!("decrypt failed: {err}"),
//!     |plaintext| plaintext,
//! );
//! assert_eq!(decrypted, plaintext);
//! # Ok::<(), recrypt_engine::Error>(())
//! ```

use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::channel::oneshot;
use tracing::{trace, warn};

use crate::capabilities::SigningKeyPair;
use crate::errors::Error;
use crate::{
    DerivedSymmetricKey, EncryptedValue, KeyPair, PairingBackend, Plaintext, PrivateKey,
    PublicKey, RecryptScheme, SchnorrSignature, TransformEncryption, TransformKey,
};

/// Result of a job running on the rayon pool.
///
/// Dropping a `Deferred` does not cancel the job; its result is discarded.
#[must_use = "a Deferred does nothing unless awaited, waited on or dispatched"]
#[derive(Debug)]
pub struct Deferred<T> {
    receiver: oneshot::Receiver<Result<T, Error>>,
}

impl<T: Send + 'static> Deferred<T> {
    /// Runs `job` on the rayon pool.
    ///
    /// Called from a rayon worker, the job runs inline instead: a worker
    /// blocking in [`Deferred::wait`] on a job queued behind it would never
    /// see that job scheduled. A panic inside `job` is caught and reported
    /// as `WorkerFailure`.
    pub fn spawn<F>(job: F) -> Self
    where
        F: FnOnce() -> Result<T, Error> + Send + 'static,
    {
        if rayon::current_thread_index().is_some() {
            trace!("already on a rayon worker, running deferred job inline");
            return Self::ready(run_caught(job));
        }
        let (sender, receiver) = oneshot::channel();
        rayon::spawn(move || {
            if sender.send(run_caught(job)).is_err() {
                trace!("deferred result dropped by caller");
            }
        });
        Self { receiver }
    }
}

fn run_caught<T, F>(job: F) -> Result<T, Error>
where
    F: FnOnce() -> Result<T, Error>,
{
    panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        warn!(%message, "deferred job panicked");
        Err(Error::WorkerFailure(message))
    })
}

impl<T> Deferred<T> {
    /// An already-resolved deferred.
    pub fn ready(result: Result<T, Error>) -> Self {
        let (sender, receiver) = oneshot::channel();
        // The receiver is alive, so the send cannot fail.
        let _ = sender.send(result);
        Self { receiver }
    }

    /// Blocks the current thread until the job finishes.
    pub fn wait(self) -> Result<T, Error> {
        futures::executor::block_on(self)
    }

    /// Blocks until the job finishes, then calls exactly one continuation.
    pub fn dispatch<R>(
        self,
        on_failure: impl FnOnce(Error) -> R,
        on_success: impl FnOnce(T) -> R,
    ) -> R {
        match self.wait() {
            Ok(value) => on_success(value),
            Err(err) => on_failure(err),
        }
    }
}

impl<T> Future for Deferred<T> {
    type Output = Result<T, Error>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.receiver.poll_unpin(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Err(Error::WorkerFailure(
                "worker exited without producing a result".into(),
            ))),
            Poll::Pending => Poll::Pending,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}

/// [`RecryptScheme`] front end whose fallible operations run on the rayon pool.
///
/// Cloning is cheap; clones share the same scheme.
#[derive(Clone, Debug)]
pub struct AsyncRecrypt<B: PairingBackend> {
    scheme: Arc<RecryptScheme<B>>,
}

impl<B: PairingBackend> AsyncRecrypt<B> {
    pub fn new(scheme: RecryptScheme<B>) -> Self {
        Self {
            scheme: Arc::new(scheme),
        }
    }

    pub fn from_shared(scheme: Arc<RecryptScheme<B>>) -> Self {
        Self { scheme }
    }

    /// The synchronous scheme behind this front end.
    pub fn scheme(&self) -> &RecryptScheme<B> {
        &self.scheme
    }

    fn run<T, F>(&self, job: F) -> Deferred<T>
    where
        T: Send + 'static,
        F: FnOnce(&RecryptScheme<B>) -> Result<T, Error> + Send + 'static,
    {
        let scheme = Arc::clone(&self.scheme);
        Deferred::spawn(move || job(&scheme))
    }

    pub fn generate_signing_key_pair(&self) -> Deferred<SigningKeyPair> {
        self.run(|scheme| scheme.generate_signing_key_pair())
    }

    pub fn generate_key_pair(&self) -> Deferred<KeyPair<B>> {
        self.run(|scheme| scheme.generate_key_pair())
    }

    pub fn compute_public_key(&self, private_key: PrivateKey<B>) -> Deferred<PublicKey<B>> {
        self.run(move |scheme| scheme.compute_public_key(&private_key))
    }

    pub fn generate_plaintext(&self) -> Deferred<Plaintext<B>> {
        self.run(|scheme| scheme.generate_plaintext())
    }

    /// Runs inline; hashing a plaintext cannot fail.
    pub fn derive_symmetric_key(&self, plaintext: &Plaintext<B>) -> DerivedSymmetricKey {
        self.scheme.derive_symmetric_key(plaintext)
    }

    /// Runs inline; the derivation cannot fail.
    pub fn derive_private_key(&self, plaintext: &Plaintext<B>) -> PrivateKey<B> {
        self.scheme.derive_private_key(plaintext)
    }

    pub fn encrypt(
        &self,
        plaintext: Plaintext<B>,
        to_public_key: PublicKey<B>,
        signing: SigningKeyPair,
    ) -> Deferred<EncryptedValue<B>> {
        self.run(move |scheme| {
            scheme.encrypt(&plaintext, &to_public_key, &signing.public, &signing.private)
        })
    }

    pub fn decrypt(
        &self,
        value: EncryptedValue<B>,
        private_key: PrivateKey<B>,
    ) -> Deferred<Plaintext<B>> {
        self.run(move |scheme| scheme.decrypt(&value, &private_key))
    }

    pub fn generate_transform_key(
        &self,
        from_private_key: PrivateKey<B>,
        to_public_key: PublicKey<B>,
        signing: SigningKeyPair,
    ) -> Deferred<TransformKey<B>> {
        self.run(move |scheme| {
            scheme.generate_transform_key(
                &from_private_key,
                &to_public_key,
                &signing.public,
                &signing.private,
            )
        })
    }

    pub fn transform(
        &self,
        value: EncryptedValue<B>,
        transform_key: TransformKey<B>,
        signing: SigningKeyPair,
    ) -> Deferred<EncryptedValue<B>> {
        self.run(move |scheme| {
            scheme.transform(&value, &transform_key, &signing.public, &signing.private)
        })
    }

    pub fn schnorr_sign(
        &self,
        private_key: PrivateKey<B>,
        public_key: PublicKey<B>,
        message: Vec<u8>,
    ) -> Deferred<SchnorrSignature<B>> {
        self.run(move |scheme| scheme.schnorr_sign(&private_key, &public_key, &message))
    }

    pub fn schnorr_verify(
        &self,
        public_key: &PublicKey<B>,
        message: &[u8],
        signature: &SchnorrSignature<B>,
    ) -> bool {
        self.scheme.schnorr_verify(public_key, message, signature)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::PairingEngine;
    use crate::capabilities::{Capabilities, SeededRandom};

    type B = PairingEngine;

    fn engine(seed: u64) -> AsyncRecrypt<B> {
        AsyncRecrypt::new(RecryptScheme::new(
            Capabilities::default().with_random(Arc::new(SeededRandom::from_seed(seed))),
        ))
    }

    #[test]
    fn spawn_resolves_with_job_result() {
        assert_eq!(Deferred::spawn(|| Ok(7u32)).wait().expect("ok"), 7);
        let err = Deferred::<u32>::spawn(|| Err(Error::InvalidKey("nope".into())))
            .wait()
            .unwrap_err();
        assert!(err.is_invalid_key());
    }

    #[test]
    fn panicking_job_reports_worker_failure() {
        let err = Deferred::<u32>::spawn(|| panic!("boom")).wait().unwrap_err();
        match err {
            Error::WorkerFailure(message) => assert_eq!(message, "boom"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn dropped_sender_reports_worker_failure() {
        let (sender, receiver) = oneshot::channel::<Result<u32, Error>>();
        drop(sender);
        let err = Deferred { receiver }.wait().unwrap_err();
        assert!(matches!(err, Error::WorkerFailure(_)));
    }

    #[test]
    fn dispatch_calls_exactly_one_continuation() {
        let failures = AtomicUsize::new(0);
        let successes = AtomicUsize::new(0);

        Deferred::ready(Ok(1u8)).dispatch(
            |_| failures.fetch_add(1, Ordering::SeqCst),
            |_| successes.fetch_add(1, Ordering::SeqCst),
        );
        Deferred::<u8>::ready(Err(Error::AuthenticationFailure("bad"))).dispatch(
            |_| failures.fetch_add(1, Ordering::SeqCst),
            |_| successes.fetch_add(1, Ordering::SeqCst),
        );
        Deferred::<u8>::spawn(|| panic!("worker")).dispatch(
            |_| failures.fetch_add(1, Ordering::SeqCst),
            |_| successes.fetch_add(1, Ordering::SeqCst),
        );

        assert_eq!(successes.load(Ordering::SeqCst), 1);
        assert_eq!(failures.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn wait_inside_a_saturated_pool_resolves() {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .expect("pool");
        let engine = engine(73);
        let pair = pool.install(|| engine.generate_key_pair().wait()).expect("keygen");
        assert_eq!(
            engine.scheme().compute_public_key(pair.private_key()).expect("public"),
            *pair.public_key()
        );

        let err = pool
            .install(|| Deferred::<u8>::spawn(|| panic!("inline")).wait())
            .unwrap_err();
        assert!(matches!(err, Error::WorkerFailure(message) if message == "inline"));
    }

    #[test]
    fn nested_waits_on_every_worker_resolve() {
        use rayon::prelude::*;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(2)
            .build()
            .expect("pool");
        let results: Vec<u32> = pool.install(|| {
            (0..8u32)
                .into_par_iter()
                .map(|i| Deferred::spawn(move || Ok(i * 2)).wait().expect("resolved"))
                .collect()
        });
        assert_eq!(results, (0..8u32).map(|i| i * 2).collect::<Vec<_>>());
    }

    #[test]
    fn deferred_is_awaitable() {
        let value = futures::executor::block_on(async { Deferred::spawn(|| Ok("done")).await });
        assert_eq!(value.expect("ok"), "done");
    }

    #[test]
    fn two_hop_round_trip_on_the_pool() {
        let engine = engine(70);
        let signing = engine.generate_signing_key_pair().wait().expect("signing");
        let group = engine.generate_key_pair().wait().expect("group");
        let user = engine.generate_key_pair().wait().expect("user");
        let device = engine.generate_key_pair().wait().expect("device");
        let plaintext = engine.generate_plaintext().wait().expect("plaintext");

        let value = engine
            .encrypt(plaintext.clone(), *group.public_key(), signing.clone())
            .wait()
            .expect("encrypt");
        let group_to_user = engine
            .generate_transform_key(group.private_key().clone(), *user.public_key(), signing.clone())
            .wait()
            .expect("group to user");
        let user_to_device = engine
            .generate_transform_key(user.private_key().clone(), *device.public_key(), signing.clone())
            .wait()
            .expect("user to device");

        let once = engine
            .transform(value.clone(), group_to_user, signing.clone())
            .wait()
            .expect("first hop");
        let twice = engine
            .transform(once, user_to_device, signing)
            .wait()
            .expect("second hop");

        assert_eq!(value.hops(), 0);
        assert_eq!(twice.hops(), 2);
        let decrypted = engine
            .decrypt(twice, device.private_key().clone())
            .wait()
            .expect("decrypt");
        assert_eq!(
            engine.derive_symmetric_key(&decrypted),
            engine.derive_symmetric_key(&plaintext)
        );
    }

    #[test]
    fn failures_surface_through_the_deferred() {
        let engine = engine(71);
        let signing = engine.generate_signing_key_pair().wait().expect("signing");
        let alice = engine.generate_key_pair().wait().expect("alice");
        let mallory = engine.generate_key_pair().wait().expect("mallory");
        let plaintext = engine.generate_plaintext().wait().expect("plaintext");
        let value = engine
            .encrypt(plaintext, *alice.public_key(), signing)
            .wait()
            .expect("encrypt");

        let err = engine
            .decrypt(value, mallory.private_key().clone())
            .wait()
            .unwrap_err();
        assert!(err.is_authentication_failure());
    }

    #[test]
    fn schnorr_through_the_pool() {
        let engine = engine(72);
        let pair = engine.generate_key_pair().wait().expect("pair");
        let signature = engine
            .schnorr_sign(pair.private_key().clone(), *pair.public_key(), b"hello".to_vec())
            .wait()
            .expect("sign");
        assert!(engine.schnorr_verify(pair.public_key(), b"hello", &signature));
        assert!(!engine.schnorr_verify(pair.public_key(), b"other", &signature));
    }
}
