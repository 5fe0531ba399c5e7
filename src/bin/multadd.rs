use cl_tutorial::{cli::{execute, init_logging, parse_args, MultAddArgs}, prelude::Result, tutorial::{multadd, Session}, utils::list_platforms_devices};

fn main () {
    let args = parse_args::<MultAddArgs>();
    init_logging();
    execute::<MultAddArgs>(&args.device.plan(), list_platforms_devices, || run(&args));
}

fn run (args: &MultAddArgs) -> Result<()> {
    let session = Session::open(args.device.platform, args.device.device)?;
    println!("Running on {}, {}", session.platform_name, session.device_name);

    let program = session.build_program(&args.device.kernels)?;
    let outcome = multadd::run(&session, &program, args.size)?;
    println!("{}", outcome.summary());
    Ok(())
}
