//! Downloads a batch of files and crunches some numbers, printing nested
//! progress lines as it goes.

use anyhow::anyhow;
use timed_task::{CancelToken, Spec, SpecFor};

const FILE_COUNT: usize = 10;
const ROUNDS: u64 = 5;

fn main() -> anyhow::Result<()> {
    Spec::new("Downloading files").run(|download| {
        download.add_note(format!("{FILE_COUNT} files"));
        for i in 1..=FILE_COUNT {
            Spec::new(format!("Downloading file {i}"))
                .parent(download)
                .run(|file| {
                    if i == 5 {
                        file.log(format_args!("Download took {} retries.", 3));
                    }
                    Ok::<_, anyhow::Error>(())
                })?;
        }
        Ok::<_, anyhow::Error>(())
    })?;

    let (output, result) = SpecFor::<u64>::new("Crunching data").run(|numbers| {
        if let Err(err) = Spec::new("Validating")
            .parent(numbers)
            .run_simple(|| Ok::<_, anyhow::Error>(()))
        {
            return (0, Err(err));
        }

        SpecFor::<u64>::new("Running solver")
            .parent(numbers)
            .run(|solver| {
                solver.add_note_with_label("Rounds", ROUNDS.to_string());
                SpecFor::new("Solving all the things")
                    .parent(solver)
                    .run_simple(|| {
                        let value = (1..ROUNDS).fold(7, |value, i| value * i);
                        (value, Err(anyhow!("a solution did not present itself")))
                    })
            })
    });
    match &result {
        Ok(()) => println!("Result: {output}"),
        Err(err) => println!("Result: {output}, Error: {err}"),
    }

    let token = CancelToken::new();
    token.cancel();
    let skipped = Spec::new("Uploading results")
        .run_ctx(&token, |_| Ok::<_, anyhow::Error>(()));
    if let Err(err) = skipped {
        println!("Skipped upload: {err}");
    }

    Ok(())
}
