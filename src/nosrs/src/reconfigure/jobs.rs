// nosrs/src/reconfigure/jobs.rs

//! Canned batch jobs the reconfiguration workflow submits.
//!
//! Statement text is fixed NOS 2.8.7 syntax. Keep it byte-exact; the host
//! is the only judge of what these mean.

use crate::console::{Credentials, Job};

/// Replaces a permanent file with the records fed as job input.
pub fn replace_file(file_name: &str, text: &str) -> Job {
    Job::new(
        "REPFILE",
        vec![
            "$COPY,INPUT,FILE.".to_string(),
            format!("$REPLACE,FILE={}.", file_name),
        ],
    )
    .with_data(text.to_string())
}

/// Edits updated deck records into the PRODUCT library.
///
/// Records travel as separate input records behind the control statements,
/// one per deck.
pub fn update_product(records: &[String]) -> Job {
    Job::new(
        "UPDPROD",
        vec![
            "$SETTL,*.".to_string(),
            "$SETJSL,*.".to_string(),
            "$SETASL,*.".to_string(),
            "$ATTACH,PRODUCT/M=W,WB.".to_string(),
            "$COPY,INPUT,LGO.".to_string(),
            "$LIBEDIT,P=PRODUCT,B=LGO,I=0,LO=EM,C.".to_string(),
        ],
    )
    .with_data(records.join("~eor\n"))
}

/// Makes a network file public and read-only for ordinary users.
pub fn make_public(file_name: &str) -> Job {
    Job::new(
        "MAKEPUB",
        vec![format!("$CHANGE,{}/CT=PU,M=R,AC=Y.", file_name)],
    )
    .with_credentials(Credentials::netadmn())
}
