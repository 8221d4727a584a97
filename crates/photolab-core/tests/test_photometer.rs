use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

use photolab_core::photometer::{Endpoint, Model, PhotometerBuilder, Role};

#[test]
fn test_role_labels_and_other() {
    assert_eq!(Role::Ref.label(), "REF.");
    assert_eq!(Role::Test.label(), "TEST");
    assert_eq!(Role::Ref.other(), Role::Test);
    assert_eq!(Role::Test.other(), Role::Ref);
    assert_eq!(Role::Ref.endpoint_var(), "REF_ENDPOINT");
    assert_eq!(Role::Test.endpoint_var(), "TEST_ENDPOINT");
    assert_eq!("ref".parse::<Role>().unwrap(), Role::Ref);
    assert_eq!("TEST".parse::<Role>().unwrap(), Role::Test);
}

#[test]
fn test_model_round_trip() {
    assert_eq!("TESS-W".parse::<Model>().unwrap(), Model::TessW);
    assert_eq!("tessp".parse::<Model>().unwrap(), Model::TessP);
    assert_eq!("TAS".parse::<Model>().unwrap(), Model::Tas);
    assert_eq!(Model::TessW.to_string(), "TESS-W");
    assert!("TESS-X".parse::<Model>().is_err());
}

#[test]
fn test_endpoint_parsing() {
    assert_eq!(
        "serial:/dev/ttyUSB0:38400".parse::<Endpoint>().unwrap(),
        Endpoint::Serial {
            port: "/dev/ttyUSB0".to_string(),
            baudrate: 38400
        }
    );
    assert_eq!(
        "tcp:192.168.4.1:24".parse::<Endpoint>().unwrap(),
        Endpoint::Tcp {
            host: "192.168.4.1".to_string(),
            port: 24
        }
    );
    assert_eq!(
        "udp::3000".parse::<Endpoint>().unwrap(),
        Endpoint::Udp { port: 3000 }
    );
}

#[test]
fn test_endpoint_defaults() {
    assert_eq!(
        "serial:/dev/ttyUSB0".parse::<Endpoint>().unwrap(),
        Endpoint::Serial {
            port: "/dev/ttyUSB0".to_string(),
            baudrate: 9600
        }
    );
    assert_eq!(
        "tcp:192.168.4.1".parse::<Endpoint>().unwrap(),
        Endpoint::Tcp {
            host: "192.168.4.1".to_string(),
            port: 23
        }
    );
    assert_eq!("udp:".parse::<Endpoint>().unwrap(), Endpoint::Udp { port: 2255 });
}

#[test]
fn test_endpoint_rejects_malformed() {
    assert!("http:example.com:80".parse::<Endpoint>().is_err());
    assert!("serial".parse::<Endpoint>().is_err());
    assert!("serial:".parse::<Endpoint>().is_err());
    assert!("tcp::".parse::<Endpoint>().is_err());
    assert!("tcp:host:notaport".parse::<Endpoint>().is_err());
}

fn serial_endpoint() -> Endpoint {
    "serial:/dev/ttyUSB0:9600".parse().unwrap()
}

fn tcp_endpoint() -> Endpoint {
    "tcp:192.168.4.1:23".parse().unwrap()
}

#[test]
fn test_builder_reference_combination() {
    let builder = PhotometerBuilder::new();
    let (photometer, _rx) = builder
        .build_with_endpoint(Model::TessW, Role::Ref, serial_endpoint())
        .unwrap();
    assert_eq!(photometer.role(), Role::Ref);
    assert_eq!(photometer.model(), Model::TessW);
    assert_eq!(photometer.endpoint(), &serial_endpoint());
}

#[test]
fn test_builder_rejects_wrong_reference_setup() {
    let builder = PhotometerBuilder::new();
    assert!(builder
        .build_with_endpoint(Model::TessP, Role::Ref, serial_endpoint())
        .is_err());
    assert!(builder
        .build_with_endpoint(Model::TessW, Role::Ref, tcp_endpoint())
        .is_err());
}

#[test]
fn test_builder_test_combinations() {
    let builder = PhotometerBuilder::new();
    assert!(builder
        .build_with_endpoint(Model::TessP, Role::Test, serial_endpoint())
        .is_ok());
    assert!(builder
        .build_with_endpoint(Model::Tas, Role::Test, serial_endpoint())
        .is_ok());
    assert!(builder
        .build_with_endpoint(Model::TessW, Role::Test, serial_endpoint())
        .is_err());
    assert!(builder
        .build_with_endpoint(Model::TessW, Role::Test, tcp_endpoint())
        .is_ok());
    assert!(builder
        .build_with_endpoint(Model::Tas, Role::Test, tcp_endpoint())
        .is_err());
}

#[tokio::test]
async fn test_tcp_readings_stream() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket
            .write_all(b"{\"freq\": 10.0, \"mag\": 18.5}\nnot a reading\n{\"freq\": 11.0}\n")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
    });

    let endpoint: Endpoint = format!("tcp:127.0.0.1:{port}").parse().unwrap();
    let builder = PhotometerBuilder::new();
    let (photometer, mut rx) = builder
        .build_with_endpoint(Model::TessW, Role::Test, endpoint)
        .unwrap();

    let task = tokio::spawn(async move { photometer.readings().await });

    let first = rx.recv().await.unwrap();
    assert_eq!(first.freq, 10.0);
    assert_eq!(first.mag, Some(18.5));
    assert_eq!(first.seq, Some(1));

    // The garbled line is discarded, not delivered.
    let second = rx.recv().await.unwrap();
    assert_eq!(second.freq, 11.0);
    assert_eq!(second.seq, Some(2));

    // Peer shutdown ends the stream.
    assert!(rx.recv().await.is_none());
    task.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_dropping_receiver_stops_task() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        loop {
            if socket.write_all(b"{\"freq\": 1.0}\n").await.is_err() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }
    });

    let endpoint: Endpoint = format!("tcp:127.0.0.1:{port}").parse().unwrap();
    let builder = PhotometerBuilder::new();
    let (photometer, mut rx) = builder
        .build_with_endpoint(Model::TessW, Role::Test, endpoint)
        .unwrap();

    let task = tokio::spawn(async move { photometer.readings().await });
    let _ = rx.recv().await.unwrap();
    drop(rx);

    // The reader notices the closed queue and returns cleanly.
    task.await.unwrap().unwrap();
}
