// Listener module
// Creates the TCP listener the board is served on

use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::TcpListener;

/// Listen backlog for pending connections
const BACKLOG: i32 = 128;

/// Create a non-blocking `TcpListener` with `SO_REUSEADDR` enabled
///
/// Reusing the address lets the board restart immediately while old
/// connections on the port are still in `TIME_WAIT`.
pub fn create_listener(addr: std::net::SocketAddr) -> std::io::Result<TcpListener> {
    let domain = if addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    socket.set_reuse_address(true)?;
    socket.set_nonblocking(true)?;
    socket.bind(&addr.into())?;
    socket.listen(BACKLOG)?;

    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
