//! Socket receive-buffer hint.

use std::io;

/// Apply an `SO_RCVBUF` hint to a socket.
///
/// The kernel treats the value as advisory (Linux doubles it and clamps
/// to `net.core.rmem_max`), so failures are reported for logging but
/// never fatal.
#[cfg(unix)]
pub fn set_recv_buffer<S: std::os::fd::AsRawFd>(socket: &S, bytes: usize) -> io::Result<()> {
    let value = bytes as libc::c_int;

    // SAFETY: `value` is a valid c_int for the duration of the call and
    // the fd is an open socket owned by the caller.
    let rc = unsafe {
        libc::setsockopt(
            socket.as_raw_fd(),
            libc::SOL_SOCKET,
            libc::SO_RCVBUF,
            (&value as *const libc::c_int).cast::<libc::c_void>(),
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        )
    };

    if rc == 0 {
        Ok(())
    } else {
        Err(io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
pub fn set_recv_buffer<S>(_socket: &S, _bytes: usize) -> io::Result<()> {
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn applies_hint_to_tcp_listener() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        set_recv_buffer(&listener, 65536).unwrap();
    }
}
