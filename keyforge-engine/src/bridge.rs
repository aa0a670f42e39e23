//! Invocation of the external engine process.

use std::{
    ffi::OsString,
    io::{ErrorKind, Read, Write},
    path::{Path, PathBuf},
    process::{ChildStdin, Command, ExitStatus, Stdio},
    thread,
    time::{Duration, Instant},
};

use log::debug;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    CertificateData,
    CertificateSigningRequest,
    CsrResponse,
    EngineCommand,
    EngineError,
    Error,
    MessageResponse,
    PrivateKeyInfo,
    TransportError,
};

/// The interval at which a running engine process is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The length of a SHA-256 digest in bytes.
const SHA256_DIGEST_LENGTH: usize = 32;

/// The length of a SHA-512 digest in bytes.
const SHA512_DIGEST_LENGTH: usize = 64;

/// The structured failure document emitted by the engine.
#[derive(Debug, Deserialize)]
struct FailureDocument {
    #[serde(rename = "Err")]
    err: String,

    #[serde(rename = "Message")]
    message: String,
}

/// The collected output of one engine process run.
#[derive(Debug)]
struct EngineOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

/// A bridge to the external cryptographic engine.
///
/// Every call spawns one engine process, passes the command and any further arguments
/// as a discrete argument vector (never through a shell), writes the hex-encoded
/// payload to the process' standard input and parses a single JSON document from its
/// standard output.
///
/// Calls carry no session state and may be issued concurrently.
/// Each call is bound by the configured deadline and is killed with a
/// [`TransportError::Timeout`] on expiry.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
///
/// use keyforge_engine::Engine;
///
/// # fn main() -> testresult::TestResult {
/// let engine = Engine::new("/usr/lib/keyforge/engine", Duration::from_secs(5));
/// let digest = engine.sha256_digest(b"hello, world!")?;
/// assert_eq!(digest.len(), 32);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Engine {
    program: PathBuf,
    timeout: Duration,
}

impl Engine {
    /// Creates a new [`Engine`] for the program at `program`.
    ///
    /// The `timeout` bounds every call made through this instance.
    /// There is no default deadline; callers decide how long an engine invocation may
    /// take.
    pub fn new(program: impl AsRef<Path>, timeout: Duration) -> Self {
        Self {
            program: program.as_ref().to_path_buf(),
            timeout,
        }
    }

    /// Returns the path of the engine program.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Returns the deadline applied to every call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns a new [`Engine`] for the same program with a different deadline.
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            program: self.program.clone(),
            timeout,
        }
    }

    /// Checks that the engine program can be spawned at all.
    ///
    /// Invokes the engine without a command.
    /// A structured error response proves that the program starts and speaks the
    /// protocol, so it is treated as success.
    ///
    /// # Errors
    ///
    /// Returns an error if the process can not be spawned, times out, or produces
    /// output that is neither a success nor an error document.
    pub fn probe(&self) -> Result<(), Error> {
        let output = self.invoke(&[], None)?;
        if output.status.success() {
            return Ok(());
        }
        match parse_failure(&output) {
            Error::Engine(_) => Ok(()),
            error => Err(error),
        }
    }

    /// Calls `command` with a raw `payload` and parses the success shape `T`.
    ///
    /// The payload is hex-encoded before transmission, making the text channel
    /// binary-safe.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the engine reports a structured failure and a
    /// [`TransportError`] if no structured response can be obtained.
    pub fn call<T: DeserializeOwned>(
        &self,
        command: EngineCommand,
        payload: &[u8],
    ) -> Result<T, Error> {
        self.call_with_args(command, &[], payload)
    }

    /// Calls `command` with additional positional `args` and a raw `payload`.
    ///
    /// Arguments are passed as a discrete argument vector to the engine process and
    /// never pass through shell interpretation.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] if the engine reports a structured failure and a
    /// [`TransportError`] if no structured response can be obtained.
    pub fn call_with_args<T: DeserializeOwned>(
        &self,
        command: EngineCommand,
        args: &[&str],
        payload: &[u8],
    ) -> Result<T, Error> {
        debug!(
            "Calling engine command {command} with {} payload bytes",
            payload.len()
        );
        let mut argv = vec![OsString::from(command.to_string())];
        argv.extend(args.iter().map(OsString::from));
        let mut line = hex::encode(payload);
        line.push('\n');
        let output = self.invoke(&argv, Some(line.as_bytes()))?;

        if output.status.success() {
            match serde_json::from_slice::<T>(&output.stdout) {
                Ok(response) => return Ok(response),
                // the success shape did not parse; fall through to the error document
                Err(_) => return Err(parse_failure(&output)),
            }
        }
        Err(parse_failure(&output))
    }

    /// Creates a SHA-256 digest over `data` using the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine call fails or the returned digest does not
    /// decode to 32 bytes.
    pub fn sha256_digest(&self, data: &[u8]) -> Result<[u8; SHA256_DIGEST_LENGTH], Error> {
        let response: MessageResponse<String> = self.call(EngineCommand::HashSha256, data)?;
        decode_digest(&response.message)
    }

    /// Creates a SHA-512 digest over `data` using the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine call fails or the returned digest does not
    /// decode to 64 bytes.
    pub fn sha512_digest(&self, data: &[u8]) -> Result<[u8; SHA512_DIGEST_LENGTH], Error> {
        let response: MessageResponse<String> = self.call(EngineCommand::HashSha512, data)?;
        decode_digest(&response.message)
    }

    /// Reports metadata for the PEM-encoded private key in `pem`.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine call fails, e.g. because the key type is not
    /// supported by the engine's introspection.
    pub fn private_key_info(&self, pem: &str) -> Result<PrivateKeyInfo, Error> {
        self.call(EngineCommand::PrivateKeyInfo, pem.as_bytes())
    }

    /// Creates a certificate signing request from `request`.
    ///
    /// Returns the PEM-encoded request exactly as produced by the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload can not be serialized or the engine call
    /// fails.
    pub fn create_csr(&self, request: &CertificateSigningRequest) -> Result<String, Error> {
        let payload = serde_json::to_vec(request).map_err(|source| TransportError::Json {
            context: "serializing the signing request payload",
            source,
        })?;
        let response: CsrResponse = self.call(EngineCommand::Csr, &payload)?;
        Ok(response.req)
    }

    /// Decodes the PEM-encoded X.509 certificate in `pem` into its attributes.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine call fails or the certificate can not be
    /// parsed by the engine.
    pub fn certificate_info(&self, pem: &str) -> Result<CertificateData, Error> {
        self.call(EngineCommand::CertificateInfo, pem.as_bytes())
    }

    /// Generates a random integer in the range `[0, max)` using the engine.
    ///
    /// The upper bound is passed positionally, not as payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the engine call fails, e.g. for a non-positive bound.
    pub fn random_int(&self, max: u64) -> Result<u64, Error> {
        let response: MessageResponse<u64> =
            self.call_with_args(EngineCommand::RandomInt, &[&max.to_string()], &[])?;
        Ok(response.message)
    }

    /// Spawns the engine process once and collects its output.
    ///
    /// The process is polled against the configured deadline and killed on expiry.
    fn invoke(&self, args: &[OsString], payload: Option<&[u8]>) -> Result<EngineOutput, TransportError> {
        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TransportError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stdin = child.stdin.take();
        let writer = match payload {
            Some(payload) => Some(writer_thread(stdin, payload.to_vec())?),
            None => {
                drop(stdin);
                None
            }
        };
        let stdout = reader_thread(child.stdout.take());
        let stderr = reader_thread(child.stderr.take());

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            if let Some(status) = child.try_wait().map_err(|source| TransportError::Io {
                context: "waiting for the engine process",
                source,
            })? {
                break status;
            }
            if Instant::now() >= deadline {
                // best effort; the process may have exited in the meantime
                let _ = child.kill();
                let _ = child.wait();
                // killing the child breaks the pipe the writer may still be blocked on
                if let Some(handle) = writer {
                    let _ = handle.join();
                }
                join_reader(stdout)?;
                join_reader(stderr)?;
                return Err(TransportError::Timeout {
                    program: self.program.clone(),
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        };

        join_writer(writer)?;
        Ok(EngineOutput {
            status,
            stdout: join_reader(stdout)?,
            stderr: join_reader(stderr)?,
        })
    }
}

/// Writes the payload to the child's standard input on a dedicated thread.
///
/// Pipes have a bounded buffer, so the write may block until the engine reads; running
/// it concurrently keeps the whole exchange under the deadline loop in
/// [`Engine::invoke`].
/// A broken pipe is tolerated, so that an engine which exits before reading its input
/// can still surface its structured error document.
fn writer_thread(
    stdin: Option<ChildStdin>,
    payload: Vec<u8>,
) -> Result<thread::JoinHandle<Result<(), TransportError>>, TransportError> {
    let Some(mut stdin) = stdin else {
        return Err(TransportError::Io {
            context: "acquiring the engine's standard input",
            source: std::io::Error::other("standard input is not piped"),
        });
    };
    Ok(thread::spawn(move || match stdin.write_all(&payload) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == ErrorKind::BrokenPipe => Ok(()),
        Err(source) => Err(TransportError::Io {
            context: "writing the payload to the engine",
            source,
        }),
    }))
}

/// Joins the payload writer thread, surfacing its write result.
fn join_writer(
    handle: Option<thread::JoinHandle<Result<(), TransportError>>>,
) -> Result<(), TransportError> {
    let Some(handle) = handle else {
        return Ok(());
    };
    handle.join().map_err(|_| TransportError::Io {
        context: "writing the payload to the engine",
        source: std::io::Error::other("payload writer thread panicked"),
    })?
}

/// Drains a child output stream on a dedicated thread.
fn reader_thread<R: Read + Send + 'static>(
    stream: Option<R>,
) -> Option<thread::JoinHandle<std::io::Result<Vec<u8>>>> {
    stream.map(|mut stream| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            stream.read_to_end(&mut buffer)?;
            Ok(buffer)
        })
    })
}

/// Joins a reader thread, mapping panics and I/O failures to [`TransportError::Io`].
fn join_reader(
    handle: Option<thread::JoinHandle<std::io::Result<Vec<u8>>>>,
) -> Result<Vec<u8>, TransportError> {
    let Some(handle) = handle else {
        return Ok(Vec::new());
    };
    handle
        .join()
        .map_err(|_| TransportError::Io {
            context: "collecting engine output",
            source: std::io::Error::other("output reader thread panicked"),
        })?
        .map_err(|source| TransportError::Io {
            context: "reading engine output",
            source,
        })
}

/// Extracts the structured failure document from engine output.
///
/// The engine writes its error document to standard output; standard error is
/// consulted as a fallback.
/// Output that parses as neither shape is a [`TransportError::MalformedResponse`].
fn parse_failure(output: &EngineOutput) -> Error {
    for stream in [&output.stdout, &output.stderr] {
        if let Ok(failure) = serde_json::from_slice::<FailureDocument>(stream) {
            return EngineError {
                code: failure.err,
                message: failure.message,
            }
            .into();
        }
    }
    TransportError::MalformedResponse {
        context: "decoding the engine response",
        output: String::from_utf8_lossy(&output.stdout).into_owned(),
    }
    .into()
}

/// Decodes a hex digest of fixed length `N`.
fn decode_digest<const N: usize>(message: &str) -> Result<[u8; N], Error> {
    let bytes = hex::decode(message).map_err(TransportError::HexDecode)?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| {
        TransportError::DigestLength {
            expected: N,
            actual,
        }
        .into()
    })
}
