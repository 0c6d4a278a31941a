extern crate otpgen;
use std::env;

use otpgen::Totp;

fn main() {
    let args = env::args();
    if args.len() != 2 {
        println!("Usage: ./make_totp secret");
        return;
    }
    let args = args.collect::<Vec<_>>();
    match Totp::from_base32(&args[1]).and_then(|totp| totp.generate_current()) {
        Ok(code) => println!("{}", code),
        Err(err) => eprintln!("error: {}", err),
    }
}
