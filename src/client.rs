//! duokv-cli - Interactive Menu Client
//!
//! A menu-driven console client for the duokv server. It speaks either
//! transport: length-prefixed frames over TCP, or one packet per command
//! over UDP. The menu, the EDIT submenu, and the local usage checks are
//! pure UI glue; the command/response contract is the server's.
//!
//! The client is sequential by design (prompt, send, wait, print), so it
//! uses plain blocking sockets.

use duokv::connection::{frame, MAX_DATAGRAM_SIZE};
use duokv::protocol::{timestamp, verbs};
use std::io::{self, BufRead, Read, Write};
use std::net::{TcpStream, UdpSocket};

/// Client configuration
struct Config {
    /// Server host
    host: String,
    /// Server port
    port: u16,
    /// Use UDP instead of TCP
    udp: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: duokv::DEFAULT_HOST.to_string(),
            port: duokv::DEFAULT_PORT,
            udp: false,
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    if i + 1 < args.len() {
                        config.host = args[i + 1].clone();
                        i += 2;
                    } else {
                        eprintln!("Error: --host requires a value");
                        std::process::exit(1);
                    }
                }
                "--port" | "-p" => {
                    if i + 1 < args.len() {
                        config.port = args[i + 1].parse().unwrap_or_else(|_| {
                            eprintln!("Error: invalid port number");
                            std::process::exit(1);
                        });
                        i += 2;
                    } else {
                        eprintln!("Error: --port requires a value");
                        std::process::exit(1);
                    }
                }
                "--transport" | "-t" => {
                    if i + 1 < args.len() {
                        config.udp = match args[i + 1].as_str() {
                            "tcp" => false,
                            "udp" => true,
                            other => {
                                eprintln!("Error: unknown transport '{}'", other);
                                std::process::exit(1);
                            }
                        };
                        i += 2;
                    } else {
                        eprintln!("Error: --transport requires a value");
                        std::process::exit(1);
                    }
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        config
    }
}

fn print_help() {
    println!(
        r#"
duokv-cli - Interactive client for the duokv server

USAGE:
    duokv-cli [OPTIONS]

OPTIONS:
    -h, --host <HOST>            Server host (default: 127.0.0.1)
    -p, --port <PORT>            Server port (default: 7856)
    -t, --transport <TRANSPORT>  tcp or udp (default: tcp)
        --help                   Print this help message
"#
    );
}

/// One client session over either transport.
enum Session {
    Tcp(TcpStream),
    Udp(UdpSocket),
}

impl Session {
    /// Connects to the server over the configured transport.
    fn connect(config: &Config) -> io::Result<Self> {
        let addr = format!("{}:{}", config.host, config.port);
        if config.udp {
            let socket = UdpSocket::bind("0.0.0.0:0")?;
            socket.connect(&addr)?;
            Ok(Session::Udp(socket))
        } else {
            Ok(Session::Tcp(TcpStream::connect(&addr)?))
        }
    }

    /// Sends one command line and waits for the single reply line.
    fn request(&mut self, line: &str) -> io::Result<String> {
        match self {
            Session::Tcp(stream) => {
                let mut bytes = Vec::new();
                frame::encode(line, &mut bytes)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
                stream.write_all(&bytes)?;

                let mut prefix = [0u8; 2];
                stream.read_exact(&mut prefix)?;
                let len = u16::from_be_bytes(prefix) as usize;

                let mut payload = vec![0u8; len];
                stream.read_exact(&mut payload)?;
                String::from_utf8(payload)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            }
            Session::Udp(socket) => {
                socket.send(line.as_bytes())?;

                let mut buf = [0u8; MAX_DATAGRAM_SIZE];
                let n = socket.recv(&mut buf)?;
                String::from_utf8(buf[..n].to_vec())
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
            }
        }
    }
}

fn display_menu() {
    println!("\nChoose an option:");
    println!("1. GET <key>");
    println!("2. PUT <key> <value>");
    println!("3. DELETE <key>");
    println!("4. KEYS");
    println!("5. EDIT");
    println!("6. QUIT");
    print!("Enter your choice: ");
    let _ = io::stdout().flush();
}

/// Prompts on stdout and reads one trimmed line from stdin.
/// Returns None on end of input.
fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{}", label);
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// The nested EDIT submenu: choose key edit, value edit, or cancel.
/// Returns the full command line to send, if any.
fn edit_menu() -> io::Result<Option<String>> {
    println!("\nEdit Menu:");
    println!("1. Edit key");
    println!("2. Edit value");
    println!("3. Cancel");

    let choice = match prompt("Enter your choice: ")? {
        Some(choice) => choice,
        None => return Ok(None),
    };

    match choice.as_str() {
        "1" => {
            let old_key = match prompt("Enter the old key: ")? {
                Some(key) => key,
                None => return Ok(None),
            };
            let new_key = match prompt("Enter the new key: ")? {
                Some(key) => key,
                None => return Ok(None),
            };
            Ok(Some(format!("{} {} {}", verbs::EDIT_KEY, old_key, new_key)))
        }
        "2" => {
            let key = match prompt("Enter the key: ")? {
                Some(key) => key,
                None => return Ok(None),
            };
            let value = match prompt("Enter the new value: ")? {
                Some(value) => value,
                None => return Ok(None),
            };
            Ok(Some(format!("{} {} {}", verbs::EDIT_VALUE, key, value)))
        }
        "3" => Ok(None),
        _ => {
            println!("Invalid choice. Please choose between 1 and 3.");
            Ok(None)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = Config::from_args();
    let mut session = Session::connect(&config)?;

    println!(
        "Connected to {}:{} over {}.",
        config.host,
        config.port,
        if config.udp { "UDP" } else { "TCP" }
    );

    let stdin = io::stdin();
    loop {
        display_menu();

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        let parts: Vec<&str> = input.split(' ').collect();
        let command = parts[0].to_uppercase();

        // Local usage checks: malformed commands never reach the server
        match command.as_str() {
            verbs::QUIT => {
                let reply = session.request(verbs::QUIT)?;
                println!("{}", reply);
                println!("[{}] Thank you for cooperation!", timestamp());
                break;
            }
            verbs::KEYS => {
                if parts.len() != 1 {
                    println!("[{}] Invalid command. Usage: KEYS", timestamp());
                    continue;
                }
                println!("{}", session.request(verbs::KEYS)?);
            }
            verbs::PUT => {
                if parts.len() != 3 {
                    println!("[{}] Invalid command. Usage: PUT <key> <value>", timestamp());
                    continue;
                }
                println!("{}", session.request(input)?);
            }
            verbs::DELETE => {
                if parts.len() != 2 {
                    println!("[{}] Invalid command. Usage: DELETE <key>", timestamp());
                    continue;
                }
                println!("{}", session.request(input)?);
            }
            verbs::GET => {
                if parts.len() != 2 {
                    println!("[{}] Invalid command. Usage: GET <key>", timestamp());
                    continue;
                }
                println!("{}", session.request(input)?);
            }
            "EDIT" => {
                if parts.len() != 1 {
                    println!("[{}] Invalid command. Usage: EDIT", timestamp());
                    continue;
                }
                if let Some(line) = edit_menu()? {
                    println!("{}", session.request(&line)?);
                }
            }
            _ => {
                println!("[{}] Invalid command.", timestamp());
            }
        }
    }

    Ok(())
}
