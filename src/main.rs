use std::{env, process::ExitCode};

use symtable_follows::{compare, extract_usernames, read_export, SymTable};

const DEFAULT_FOLLOWING: &str = "following.json";
const DEFAULT_FOLLOWERS: &str = "followers.json";

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("symtable-follows");

    let (following_path, followers_path) = match args.len() {
        1 => (DEFAULT_FOLLOWING, DEFAULT_FOLLOWERS),
        3 => (args[1].as_str(), args[2].as_str()),
        _ => {
            eprintln!("Usage: {program} [<following_file> <followers_file>]");
            return ExitCode::FAILURE;
        }
    };

    println!("Attempting to open following file: {following_path}");
    println!("Attempting to open followers file: {followers_path}");

    let (following_json, followers_json) =
        match (read_export(following_path), read_export(followers_path)) {
            (Ok(a), Ok(b)) => (a, b),
            (a, b) => {
                for err in [a.err(), b.err()].into_iter().flatten() {
                    eprintln!("{err}");
                }
                eprintln!("Error reading files.");
                return ExitCode::FAILURE;
            }
        };

    let mut following = SymTable::new();
    let mut followers = SymTable::new();
    extract_usernames(&following_json, &mut following);
    extract_usernames(&followers_json, &mut followers);

    print!("{}", compare(&following, &followers));
    ExitCode::SUCCESS
}
