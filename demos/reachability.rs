use csv::ReaderBuilder;
use ndarray::Array2;
use optics_clustering::{extract_clusters, find_k_peaks, Fit, Optics};
use std::{env, fs::File, process::exit};

fn main() {
    let (file, eps, min_pts, n_clusters, outlier_threshold) = parse();
    let data_file = File::open(file).expect("file open failed");
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .from_reader(data_file);
    let mut nfeatures = 0;
    let data: Vec<f64> = rdr
        .deserialize()
        .map(|v| {
            let r: Vec<f64> = v.expect("corrupted data");
            if nfeatures < 1 {
                nfeatures = r.len();
            }
            r.into_iter()
        })
        .flatten()
        .collect();
    if nfeatures < 1 {
        println!(
            "data file is too small: {} feature(s) detected, {} entries in total",
            nfeatures,
            data.len()
        );
        exit(0);
    }
    let nevents = data.len() / nfeatures;
    let data = Array2::from_shape_vec((nevents, nfeatures), data).expect("data shape error");

    // a negative radius on the command line means "no limit"
    let eps = if eps < 0.0 { f64::MAX } else { eps };

    let mut model = Optics::new(eps, min_pts);
    let ordering = model.fit(&data).expect("invalid parameters");

    let mut borders =
        find_k_peaks(ordering.reachabilities(), n_clusters).expect("invalid cluster count");
    borders.sort_unstable();
    let clusters =
        extract_clusters(&ordering, &borders, outlier_threshold).expect("borders fit the ordering");

    println!("========= Report =========");
    println!("# of events processed: {}", data.nrows());
    println!("# of features provided: {}", data.ncols());
    println!("# of unreachable points: {}", ordering.unreachable_count());
    if let Some(max) = ordering.max_finite_reachability() {
        println!("largest finite reachability: {max}");
    }
    for (i, cluster) in clusters.iter().enumerate().skip(1) {
        println!("cluster {}: {} point(s)", i, cluster.len());
    }
    println!("# of outliers: {}", clusters[0].len());
}

fn parse() -> (String, f64, usize, usize, f64) {
    let args = env::args().collect::<Vec<_>>();

    if args.len() <= 1 || args[1] == "--help" || args[1] == "-h" {
        help();
        exit(0);
    }

    let path = args.last().expect("unable to detect data file").clone();
    if args.len() < 3 {
        return (path, 0.5, 5, 2, 0.0);
    }

    if args.len() == 7 && (args[1] == "--params" || args[1] == "-p") {
        let eps: f64 = args[2].parse().unwrap_or(0.5);
        let min_pts: usize = args[3].parse().unwrap_or(5);
        let n_clusters: usize = args[4].parse().unwrap_or(2);
        let outlier_threshold: f64 = args[5].parse().unwrap_or(0.0);
        return (path, eps, min_pts, n_clusters, outlier_threshold);
    }

    println!("unable to process provided arguments: ");
    for (nth, arg) in args.iter().enumerate().take(6) {
        println!("{}. {:?}", nth, arg);
    }
    exit(0);
}

fn help() {
    println!(
        "USAGE: \
        \n reachability [DATAFILE] \
        \n \
        \nFlags: \
        \n    -h, --help       Prints help information \
        \n \
        \nARG: \
        \n    -p, --params <eps> <min_pts> <n_clusters> <outlier_threshold> \
        \n                  Sets the ordering and extraction parameters; \
        \n                  a negative <eps> searches without a radius limit \
        \n    <DATAFILE>    A CSV data file that satisfies the following: \
        \n                  1) No header line \
        \n                  2) `,` as delimiter \
        \n                  3) data can be accepted by `str::parse::<f64>` \
        \n                     only (e.g. `%.2f`)"
    );
}
