use kube::CustomResourceExt;
use tempo_k8s::crd::{TempoMonolithic, TempoStack};

fn main() {
    print!("{}", serde_yaml::to_string(&TempoStack::crd()).unwrap());
    println!("---");
    print!("{}", serde_yaml::to_string(&TempoMonolithic::crd()).unwrap());
}
